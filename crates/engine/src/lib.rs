//! The draw-and-gating engine.
//!
//! - [`DrawOrchestrator`] -- owns the play state machine, the win history
//!   and the eligibility flag. Purely synchronous; one owner, no locks.
//! - [`DrawService`] -- runs the orchestrator on a single Tokio task and
//!   feeds it user commands, sync outcomes and eligibility refreshes over
//!   channels. [`DrawHandle`] is the cheap, cloneable front door.
//! - [`EligibilityMonitor`] -- the recurring re-check that notices window
//!   boundaries crossed while nobody is clicking. Explicit `start`/`stop`.

mod error;
pub mod monitor;
pub mod orchestrator;
pub mod service;

pub use error::EngineError;
pub use monitor::EligibilityMonitor;
pub use orchestrator::{
    DrawOrchestrator, DrawOutcome, EngineSnapshot, ResetOutcome, ResetTicket, RevealOutcome,
};
pub use service::{DrawHandle, DrawService, ServiceConfig};
