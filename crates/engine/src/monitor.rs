//! Periodic eligibility re-check.
//!
//! A window boundary can pass while nobody interacts with the game. The
//! [`EligibilityMonitor`] asks the draw service to recompute eligibility on
//! a fixed interval so the cached flag never goes stale for long. It owns
//! its task and must be stopped on teardown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::service::DrawHandle;

/// Re-check interval when none is configured.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// EligibilityMonitor
// ---------------------------------------------------------------------------

pub struct EligibilityMonitor {
    interval: Duration,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl EligibilityMonitor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the check loop against `draw`. A running monitor is left as is.
    pub fn start(&mut self, draw: DrawHandle) {
        if self.is_running() {
            return;
        }

        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        let interval = self.interval;

        tracing::debug!(interval_secs = interval.as_secs(), "Eligibility monitor started");
        self.task = Some(tokio::spawn(run(draw, interval, cancel)));
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EligibilityMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(draw: DrawHandle, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Eligibility monitor cancelled");
                break;
            }
            _ = ticker.tick() => {
                if draw.refresh_eligibility().await.is_err() {
                    tracing::debug!("Draw service gone, eligibility monitor exiting");
                    break;
                }
            }
        }
    }
}
