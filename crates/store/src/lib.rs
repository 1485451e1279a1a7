//! Durable local state for the prize draw.
//!
//! Everything the engine persists is a string under a stable key in a
//! [`KeyValueStore`]:
//!
//! - [`HISTORY_KEY`] -- JSON array of win records, most recent first.
//! - [`LAST_PLAYED_KEY`] -- epoch-millisecond timestamp of the last play.
//!
//! [`WinRecordStore`] keeps both in memory and mirrors every mutation to the
//! backing store synchronously. Two backends are provided: [`FileStore`]
//! (a single JSON file) and [`MemoryStore`] (tests, ephemeral runs).

mod error;
pub mod file;
pub mod history;
pub mod kv;
pub mod last_played;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use history::HISTORY_KEY;
pub use kv::{KeyValueStore, KvWrite};
pub use last_played::LAST_PLAYED_KEY;
pub use memory::MemoryStore;
pub use store::WinRecordStore;
