//! Domain building blocks for the daily prize draw.
//!
//! This crate has zero internal deps so it can be shared by the store,
//! ledger, engine and API crates alike:
//!
//! - [`window`] -- daily eligibility window policy.
//! - [`prize`] -- prize definitions, the ordered prize table and greetings.
//! - [`selection`] -- weighted-random prize selection.
//! - [`voucher`] -- voucher code generation.
//! - [`record`] -- the persisted [`WinRecord`](record::WinRecord).
//! - [`draw`] -- pending draws and the draw phase state machine.

pub mod clock;
pub mod draw;
pub mod error;
pub mod prize;
pub mod record;
pub mod selection;
pub mod types;
pub mod voucher;
pub mod window;
