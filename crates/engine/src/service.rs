//! Single-owner draw service.
//!
//! [`DrawService::start`] moves a [`DrawOrchestrator`] onto its own Tokio
//! task. Everything that touches game state arrives on that task as a
//! message: user commands from [`DrawHandle`], ledger answers from the
//! [`SyncReconciler`](lucky_ledger::SyncReconciler) channel, and refreshes
//! from the [`EligibilityMonitor`]. Messages are applied one at a time, so a
//! sync answer can never interleave with a reveal or a reset.
//!
//! After a reveal the service waits `settle_delay` and then returns the
//! cycle to `Idle` on its own.

use std::pin::Pin;
use std::time::Duration;

use lucky_core::record::WinRecord;
use lucky_ledger::SyncOutcome;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::monitor::{EligibilityMonitor, DEFAULT_CHECK_INTERVAL};
use crate::orchestrator::{
    DrawOrchestrator, DrawOutcome, EngineSnapshot, ResetOutcome, ResetTicket, RevealOutcome,
};
use crate::EngineError;

/// Pause between a reveal and the automatic return to `Idle`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Pending commands buffered before callers start waiting.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Timing knobs for [`DrawService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub settle_delay: Duration,
    pub eligibility_interval: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            eligibility_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

enum Command {
    StartDraw(oneshot::Sender<DrawOutcome>),
    ConfirmReveal(oneshot::Sender<RevealOutcome>),
    RefreshEligibility(oneshot::Sender<bool>),
    Snapshot(oneshot::Sender<EngineSnapshot>),
    History(oneshot::Sender<Vec<WinRecord>>),
    ViewHistoryItem {
        id: String,
        reply: oneshot::Sender<Option<WinRecord>>,
    },
    DismissCurrentWin(oneshot::Sender<Option<WinRecord>>),
    RequestReset(oneshot::Sender<ResetTicket>),
    ConfirmReset {
        token: Uuid,
        reply: oneshot::Sender<ResetOutcome>,
    },
}

// ---------------------------------------------------------------------------
// DrawHandle
// ---------------------------------------------------------------------------

/// Cloneable front door to a running [`DrawService`].
///
/// Every call fails with [`EngineError::Stopped`] once the service is gone.
#[derive(Clone)]
pub struct DrawHandle {
    tx: mpsc::Sender<Command>,
}

impl DrawHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| EngineError::Stopped)?;
        rx.await.map_err(|_| EngineError::Stopped)
    }

    pub async fn start_draw(&self) -> Result<DrawOutcome, EngineError> {
        self.request(Command::StartDraw).await
    }

    pub async fn confirm_reveal(&self) -> Result<RevealOutcome, EngineError> {
        self.request(Command::ConfirmReveal).await
    }

    /// Recompute eligibility now. Returns whether the window is used up.
    pub async fn refresh_eligibility(&self) -> Result<bool, EngineError> {
        self.request(Command::RefreshEligibility).await
    }

    pub async fn snapshot(&self) -> Result<EngineSnapshot, EngineError> {
        self.request(Command::Snapshot).await
    }

    /// Win history, most recent first.
    pub async fn history(&self) -> Result<Vec<WinRecord>, EngineError> {
        self.request(Command::History).await
    }

    pub async fn view_history_item(&self, id: impl Into<String>) -> Result<Option<WinRecord>, EngineError> {
        let id = id.into();
        self.request(|reply| Command::ViewHistoryItem { id, reply })
            .await
    }

    pub async fn dismiss_current_win(&self) -> Result<Option<WinRecord>, EngineError> {
        self.request(Command::DismissCurrentWin).await
    }

    pub async fn request_reset(&self) -> Result<ResetTicket, EngineError> {
        self.request(Command::RequestReset).await
    }

    pub async fn confirm_reset(&self, token: Uuid) -> Result<ResetOutcome, EngineError> {
        self.request(|reply| Command::ConfirmReset { token, reply })
            .await
    }
}

// ---------------------------------------------------------------------------
// DrawService
// ---------------------------------------------------------------------------

/// The running engine: state task plus eligibility monitor.
pub struct DrawService {
    handle: DrawHandle,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    monitor: EligibilityMonitor,
}

impl DrawService {
    /// Spawn the state task and start the eligibility monitor.
    ///
    /// `outcomes` is the receiver paired with the orchestrator's reconciler.
    pub fn start(
        orchestrator: DrawOrchestrator,
        outcomes: mpsc::UnboundedReceiver<SyncOutcome>,
        config: ServiceConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(
            orchestrator,
            rx,
            outcomes,
            config.settle_delay,
            cancel.clone(),
        ));
        let handle = DrawHandle { tx };

        let mut monitor = EligibilityMonitor::new(config.eligibility_interval);
        monitor.start(handle.clone());

        tracing::info!(
            settle_delay_ms = config.settle_delay.as_millis() as u64,
            eligibility_interval_secs = config.eligibility_interval.as_secs(),
            "Draw service started"
        );

        Self {
            handle,
            cancel,
            task,
            monitor,
        }
    }

    pub fn handle(&self) -> DrawHandle {
        self.handle.clone()
    }

    /// Stop the monitor, then the state task, and wait for both.
    ///
    /// Ledger calls already in flight keep running; their answers are
    /// dropped.
    pub async fn shutdown(mut self) {
        self.monitor.stop().await;
        self.cancel.cancel();
        let _ = self.task.await;
        tracing::info!("Draw service stopped");
    }
}

async fn run(
    mut orchestrator: DrawOrchestrator,
    mut commands: mpsc::Receiver<Command>,
    mut outcomes: mpsc::UnboundedReceiver<SyncOutcome>,
    settle_delay: Duration,
    cancel: CancellationToken,
) {
    let mut settle: Option<Pin<Box<Sleep>>> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Draw service cancelled");
                break;
            }
            Some(outcome) = outcomes.recv() => {
                orchestrator.apply_sync_outcome(outcome);
            }
            _ = settle_elapsed(&mut settle) => {
                settle = None;
                orchestrator.settle();
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    tracing::debug!("All draw handles dropped");
                    break;
                };
                if handle_command(&mut orchestrator, command) {
                    settle = Some(Box::pin(tokio::time::sleep(settle_delay)));
                }
            }
        }
    }
}

/// Resolves when the armed settle timer fires; never resolves unarmed.
async fn settle_elapsed(settle: &mut Option<Pin<Box<Sleep>>>) {
    match settle {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

/// Apply one command. Returns `true` when a reveal happened and the settle
/// timer must be armed.
fn handle_command(orchestrator: &mut DrawOrchestrator, command: Command) -> bool {
    let mut revealed = false;

    match command {
        Command::StartDraw(reply) => {
            let _ = reply.send(orchestrator.start_draw());
        }
        Command::ConfirmReveal(reply) => {
            let outcome = orchestrator.confirm_reveal();
            revealed = matches!(outcome, RevealOutcome::Revealed { .. });
            let _ = reply.send(outcome);
        }
        Command::RefreshEligibility(reply) => {
            let _ = reply.send(orchestrator.refresh_eligibility());
        }
        Command::Snapshot(reply) => {
            let _ = reply.send(orchestrator.snapshot());
        }
        Command::History(reply) => {
            let _ = reply.send(orchestrator.history().to_vec());
        }
        Command::ViewHistoryItem { id, reply } => {
            let _ = reply.send(orchestrator.view_history_item(&id).cloned());
        }
        Command::DismissCurrentWin(reply) => {
            let _ = reply.send(orchestrator.dismiss_current_win());
        }
        Command::RequestReset(reply) => {
            let _ = reply.send(orchestrator.request_reset());
        }
        Command::ConfirmReset { token, reply } => {
            let _ = reply.send(orchestrator.confirm_reset(token));
        }
    }

    revealed
}
