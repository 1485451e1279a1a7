//! Fire-and-forget sync of new win records.
//!
//! [`SyncReconciler::dispatch`] spawns the ledger call and returns at once.
//! When the call settles, a [`SyncOutcome`] is sent to whoever owns the win
//! history; that owner applies it (or ignores it if the record is gone).
//! The background task never touches the history itself.

use std::sync::Arc;

use lucky_core::record::WinRecord;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ledger::Ledger;

/// Result of one sync attempt, posted back to the state owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub record_id: String,
    /// `true` only when the ledger confirmed acceptance.
    pub synced: bool,
}

/// Report `record` to `ledger` once.
///
/// Failures are logged and reported as `false`; nothing is retried.
pub async fn reconcile(ledger: &dyn Ledger, record: &WinRecord) -> bool {
    match ledger.log_win(record).await {
        Ok(true) => {
            tracing::info!(record_id = %record.id, "Win synced to ledger");
            true
        }
        Ok(false) => {
            tracing::warn!(record_id = %record.id, "Ledger declined win, record stays unsynced");
            false
        }
        Err(e) => {
            tracing::warn!(record_id = %record.id, error = %e, "Ledger sync failed, record stays unsynced");
            false
        }
    }
}

/// Dispatches sync attempts without blocking the caller.
#[derive(Clone)]
pub struct SyncReconciler {
    ledger: Arc<dyn Ledger>,
    outcomes: mpsc::UnboundedSender<SyncOutcome>,
}

impl SyncReconciler {
    /// Create a reconciler and the receiver its outcomes arrive on.
    pub fn new(ledger: Arc<dyn Ledger>) -> (Self, mpsc::UnboundedReceiver<SyncOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (Self { ledger, outcomes }, rx)
    }

    /// Spawn the ledger call for `record`.
    ///
    /// The returned handle may be dropped; in-flight calls are never
    /// cancelled and report whenever they finish. If the receiver is gone by
    /// then, the outcome is discarded.
    pub fn dispatch(&self, record: WinRecord) -> JoinHandle<()> {
        let ledger = Arc::clone(&self.ledger);
        let outcomes = self.outcomes.clone();

        tracing::debug!(record_id = %record.id, "Dispatching ledger sync");

        tokio::spawn(async move {
            let synced = reconcile(ledger.as_ref(), &record).await;
            let outcome = SyncOutcome {
                record_id: record.id,
                synced,
            };
            if outcomes.send(outcome).is_err() {
                tracing::debug!("Sync outcome dropped, state owner has shut down");
            }
        })
    }
}
