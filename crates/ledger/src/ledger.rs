//! The remote ledger contract and its in-process implementations.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lucky_core::record::WinRecord;

use crate::LedgerError;

/// External record of wins.
///
/// `Ok(true)` means the ledger confirmed it accepted the record. `Ok(false)`
/// and `Err(_)` both leave the record unsynced. Callers make at most one
/// attempt per record.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn log_win(&self, record: &WinRecord) -> Result<bool, LedgerError>;
}

// ---------------------------------------------------------------------------
// DisabledLedger
// ---------------------------------------------------------------------------

/// Ledger used when no endpoint is configured. Never accepts anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLedger;

#[async_trait]
impl Ledger for DisabledLedger {
    async fn log_win(&self, record: &WinRecord) -> Result<bool, LedgerError> {
        tracing::debug!(record_id = %record.id, "Ledger disabled, record stays unsynced");
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// How a [`MemoryLedger`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBehavior {
    /// Resolve `Ok(true)`.
    Accept,
    /// Resolve `Ok(false)`.
    Decline,
    /// Resolve `Err(LedgerError::Rejected)`.
    Fail,
}

/// In-process ledger for tests and local runs.
///
/// Keeps every record it was asked to log and answers according to its
/// [`LedgerBehavior`], optionally after a delay.
pub struct MemoryLedger {
    behavior: Mutex<LedgerBehavior>,
    delay: Duration,
    received: Mutex<Vec<WinRecord>>,
}

impl MemoryLedger {
    pub fn new(behavior: LedgerBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            delay: Duration::ZERO,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(LedgerBehavior::Accept)
    }

    pub fn declining() -> Self {
        Self::new(LedgerBehavior::Decline)
    }

    pub fn failing() -> Self {
        Self::new(LedgerBehavior::Fail)
    }

    /// Answer only after `delay` has elapsed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_behavior(&self, behavior: LedgerBehavior) {
        *self.behavior.lock().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    /// Records logged so far, oldest first.
    pub fn received(&self) -> Vec<WinRecord> {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn log_win(&self, record: &WinRecord) -> Result<bool, LedgerError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());

        let behavior = *self.behavior.lock().unwrap_or_else(|e| e.into_inner());
        match behavior {
            LedgerBehavior::Accept => Ok(true),
            LedgerBehavior::Decline => Ok(false),
            LedgerBehavior::Fail => Err(LedgerError::Rejected("memory ledger set to fail".into())),
        }
    }
}
