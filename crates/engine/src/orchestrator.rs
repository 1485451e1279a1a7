//! The play cycle state owner.
//!
//! [`DrawOrchestrator`] holds everything a play touches: the phase, the
//! pending prize, the cached eligibility flag, the win history and the
//! reset ticket. All methods take `&mut self` and never block; the service
//! task serializes callers, and ledger answers come back as
//! [`SyncOutcome`] messages instead of touching state from another task.
//!
//! Rejected actions (drawing twice, revealing with nothing pending) are
//! silent no-ops reported through the outcome enums, never errors.

use std::sync::Arc;

use chrono::TimeDelta;
use lucky_core::clock::{Clock, SystemClock};
use lucky_core::draw::{state_machine, DrawPhase, PendingDraw};
use lucky_core::prize::PrizeTable;
use lucky_core::record::WinRecord;
use lucky_core::selection::{thread_rng_sampler, Sampler};
use lucky_core::types::Timestamp;
use lucky_core::voucher::generate_voucher_code;
use lucky_core::window::WindowPolicy;
use lucky_ledger::{SyncOutcome, SyncReconciler};
use lucky_store::WinRecordStore;
use serde::Serialize;
use uuid::Uuid;

/// How long a reset ticket stays valid when none is configured.
pub const DEFAULT_RESET_TTL_SECS: i64 = 120;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of [`DrawOrchestrator::start_draw`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawOutcome {
    /// A prize was selected and awaits the reveal.
    Started { pending: PendingDraw },
    /// This window's play is used up.
    AlreadyPlayed { next_window_start: Timestamp },
    /// A cycle is already running.
    InProgress { phase: DrawPhase },
}

/// Result of [`DrawOrchestrator::confirm_reveal`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RevealOutcome {
    Revealed { record: WinRecord },
    /// No draw is pending.
    NothingPending,
    /// The reveal already happened for this cycle.
    AlreadyRevealing,
}

/// Proof that a reset was asked for. Must be presented to
/// [`DrawOrchestrator::confirm_reset`] before `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetTicket {
    pub token: Uuid,
    pub expires_at: Timestamp,
}

/// Result of [`DrawOrchestrator::confirm_reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResetOutcome {
    /// History and last-play time were wiped.
    Reset { cleared: usize },
    /// No ticket outstanding, or the token does not match it.
    InvalidTicket,
    /// The ticket ran out before it was confirmed.
    Expired,
}

/// Read-only view of the engine for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub phase: DrawPhase,
    pub pending: Option<PendingDraw>,
    pub has_played: bool,
    /// 1 while the window's play is unused, otherwise 0.
    pub attempts_remaining: u8,
    pub window_start: Timestamp,
    pub next_window_start: Timestamp,
    pub last_played_at: Option<Timestamp>,
    pub current_win: Option<WinRecord>,
    pub history_len: usize,
    pub unsynced: usize,
}

// ---------------------------------------------------------------------------
// DrawOrchestrator
// ---------------------------------------------------------------------------

pub struct DrawOrchestrator {
    table: Arc<PrizeTable>,
    policy: WindowPolicy,
    clock: Arc<dyn Clock>,
    sampler: Sampler,
    store: WinRecordStore,
    reconciler: SyncReconciler,
    reset_ttl: TimeDelta,

    phase: DrawPhase,
    pending: Option<PendingDraw>,
    has_played: bool,
    current_win: Option<WinRecord>,
    reset_ticket: Option<ResetTicket>,
}

impl DrawOrchestrator {
    /// Build an orchestrator on the system clock and thread RNG.
    ///
    /// Eligibility is computed immediately from the loaded last-play time.
    pub fn new(
        table: Arc<PrizeTable>,
        policy: WindowPolicy,
        store: WinRecordStore,
        reconciler: SyncReconciler,
    ) -> Self {
        let mut orchestrator = Self {
            table,
            policy,
            clock: Arc::new(SystemClock),
            sampler: thread_rng_sampler(),
            store,
            reconciler,
            reset_ttl: TimeDelta::seconds(DEFAULT_RESET_TTL_SECS),
            phase: DrawPhase::Idle,
            pending: None,
            has_played: false,
            current_win: None,
            reset_ticket: None,
        };
        orchestrator.refresh_eligibility();
        orchestrator
    }

    /// Replace the clock and recompute eligibility against it.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.refresh_eligibility();
        self
    }

    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_reset_ttl(mut self, ttl: TimeDelta) -> Self {
        self.reset_ttl = ttl;
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn pending(&self) -> Option<&PendingDraw> {
        self.pending.as_ref()
    }

    pub fn has_played(&self) -> bool {
        self.has_played
    }

    pub fn current_win(&self) -> Option<&WinRecord> {
        self.current_win.as_ref()
    }

    pub fn prize_table(&self) -> &PrizeTable {
        &self.table
    }

    /// Win history, most recent first.
    pub fn history(&self) -> &[WinRecord] {
        self.store.records()
    }

    /// Look up one past win. Changes nothing.
    pub fn view_history_item(&self, id: &str) -> Option<&WinRecord> {
        self.store.get(id)
    }

    // -- eligibility --------------------------------------------------------

    /// Recompute `has_played` from the stored last-play time and the clock.
    ///
    /// Returns the fresh value.
    pub fn refresh_eligibility(&mut self) -> bool {
        let now = self.clock.now();
        let played = self
            .policy
            .is_within_current_window(self.store.last_played_at(), now);

        if played != self.has_played {
            if played {
                tracing::debug!("Play already used in the current window");
            } else {
                tracing::info!(
                    window_start = %self.policy.window_start(now),
                    "New play window open"
                );
            }
        }

        self.has_played = played;
        played
    }

    // -- play cycle ---------------------------------------------------------

    /// Select a prize and move to `Pending`.
    ///
    /// Eligibility is re-evaluated first so a boundary crossed since the
    /// last periodic check is honored.
    pub fn start_draw(&mut self) -> DrawOutcome {
        self.refresh_eligibility();

        if self.phase != DrawPhase::Idle {
            tracing::debug!(phase = %self.phase, "Draw ignored, cycle in progress");
            return DrawOutcome::InProgress { phase: self.phase };
        }
        if self.has_played {
            let next_window_start = self.policy.next_window_start(self.clock.now());
            tracing::debug!(%next_window_start, "Draw ignored, already played this window");
            return DrawOutcome::AlreadyPlayed { next_window_start };
        }

        let prize = self.table.draw(&mut self.sampler).clone();
        let pending = PendingDraw::new(prize);

        self.transition(DrawPhase::Pending);
        self.pending = Some(pending.clone());

        tracing::info!(prize_id = %pending.prize.id, value = pending.prize.value, "Draw started");
        DrawOutcome::Started { pending }
    }

    /// Turn the pending draw into a win record.
    ///
    /// Persists the record together with the last-play time, marks the
    /// window as played and hands the record to the ledger without waiting
    /// for an answer.
    pub fn confirm_reveal(&mut self) -> RevealOutcome {
        match self.phase {
            DrawPhase::Revealing => {
                tracing::debug!("Reveal ignored, already revealing");
                return RevealOutcome::AlreadyRevealing;
            }
            DrawPhase::Idle => {
                tracing::debug!("Reveal ignored, nothing pending");
                return RevealOutcome::NothingPending;
            }
            DrawPhase::Pending => {}
        }
        let Some(pending) = self.pending.as_ref() else {
            tracing::warn!("Pending phase without a pending draw");
            return RevealOutcome::NothingPending;
        };

        let now = self.clock.now();
        let record = WinRecord::from_draw(pending, generate_voucher_code(pending.prize.value), now);

        self.transition(DrawPhase::Revealing);

        if let Err(e) = self.store.commit_win(record.clone()) {
            tracing::error!(record_id = %record.id, error = %e, "Failed to persist win record");
        }
        self.has_played = true;
        self.current_win = Some(record.clone());

        tracing::info!(
            record_id = %record.id,
            prize_id = %record.prize_id,
            value = record.value,
            "Prize revealed"
        );

        self.reconciler.dispatch(record.clone());
        RevealOutcome::Revealed { record }
    }

    /// Close a revealed cycle: back to `Idle`, pending draw dropped.
    ///
    /// Returns `false` when there was nothing to settle.
    pub fn settle(&mut self) -> bool {
        if self.phase != DrawPhase::Revealing {
            return false;
        }
        self.transition(DrawPhase::Idle);
        self.pending = None;
        true
    }

    /// Hide the win currently on display.
    pub fn dismiss_current_win(&mut self) -> Option<WinRecord> {
        self.current_win.take()
    }

    // -- ledger sync --------------------------------------------------------

    /// Apply a sync answer. Unknown or already synced records are ignored.
    pub fn apply_sync_outcome(&mut self, outcome: SyncOutcome) {
        if !outcome.synced {
            return;
        }

        let marked = match self.store.mark_synced(&outcome.record_id) {
            Ok(true) => {
                tracing::debug!(record_id = %outcome.record_id, "Record marked synced");
                true
            }
            Ok(false) => {
                tracing::debug!(record_id = %outcome.record_id, "Sync outcome for absent record ignored");
                false
            }
            Err(e) => {
                // The in-memory record is flagged even when the write fails.
                tracing::error!(record_id = %outcome.record_id, error = %e, "Failed to persist sync flag");
                true
            }
        };

        if marked {
            if let Some(win) = self
                .current_win
                .as_mut()
                .filter(|w| w.id == outcome.record_id)
            {
                win.synced = true;
            }
        }
    }

    // -- reset --------------------------------------------------------------

    /// Issue a fresh reset ticket, replacing any outstanding one.
    pub fn request_reset(&mut self) -> ResetTicket {
        let ticket = ResetTicket {
            token: Uuid::new_v4(),
            expires_at: self.clock.now() + self.reset_ttl,
        };
        tracing::info!(expires_at = %ticket.expires_at, "Reset requested");
        self.reset_ticket = Some(ticket.clone());
        ticket
    }

    /// Wipe history and last-play time if `token` matches a live ticket.
    ///
    /// The ticket is consumed whether it succeeds or has expired. A reset
    /// never touches the draw phase.
    pub fn confirm_reset(&mut self, token: Uuid) -> ResetOutcome {
        let Some(ticket) = self.reset_ticket.as_ref().filter(|t| t.token == token) else {
            tracing::warn!("Reset confirmation with unknown ticket");
            return ResetOutcome::InvalidTicket;
        };

        if self.clock.now() > ticket.expires_at {
            self.reset_ticket = None;
            tracing::warn!("Reset ticket expired");
            return ResetOutcome::Expired;
        }
        self.reset_ticket = None;

        let cleared = self.store.len();
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to persist reset");
        }
        self.current_win = None;
        self.refresh_eligibility();

        tracing::info!(cleared, "Win history reset");
        ResetOutcome::Reset { cleared }
    }

    // -- presentation -------------------------------------------------------

    pub fn snapshot(&self) -> EngineSnapshot {
        let now = self.clock.now();
        EngineSnapshot {
            phase: self.phase,
            pending: self.pending.clone(),
            has_played: self.has_played,
            attempts_remaining: if self.has_played { 0 } else { 1 },
            window_start: self.policy.window_start(now),
            next_window_start: self.policy.next_window_start(now),
            last_played_at: self.store.last_played_at(),
            current_win: self.current_win.clone(),
            history_len: self.store.len(),
            unsynced: self.store.records().iter().filter(|r| !r.synced).count(),
        }
    }

    fn transition(&mut self, to: DrawPhase) {
        if let Err(e) = state_machine::validate_transition(self.phase, to) {
            tracing::error!(error = %e, "Draw phase transition rejected");
            return;
        }
        tracing::debug!(from = %self.phase, to = %to, "Draw phase transition");
        self.phase = to;
    }
}
