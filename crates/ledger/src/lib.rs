//! Remote ledger reconciliation.
//!
//! Every revealed win is reported once to an external ledger. Reporting is
//! best effort and never blocks play:
//!
//! - [`Ledger`] -- the opaque remote call, `log_win(record) -> bool`.
//! - [`HttpLedger`] -- JSON POST to a configured endpoint.
//! - [`DisabledLedger`] -- used when no endpoint is configured.
//! - [`MemoryLedger`] -- scriptable in-process ledger for tests.
//! - [`SyncReconciler`] -- spawns the call and posts a [`SyncOutcome`] back
//!   to the state owner over a channel.

mod error;
pub mod http;
pub mod ledger;
pub mod reconciler;

pub use error::LedgerError;
pub use http::HttpLedger;
pub use ledger::{DisabledLedger, Ledger, MemoryLedger};
pub use reconciler::{reconcile, SyncOutcome, SyncReconciler};
