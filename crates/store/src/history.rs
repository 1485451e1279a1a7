//! Encoding of the win history under [`HISTORY_KEY`].

use lucky_core::record::WinRecord;

use crate::kv::KeyValueStore;
use crate::{StoreError, StoreResult};

/// Storage key of the history. The `_v2` suffix versions the record layout.
pub const HISTORY_KEY: &str = "lucky_scratch_history_v2";

/// Read the stored history, most recent first.
///
/// Absent, unreadable or malformed data all yield an empty history.
pub fn load_history(kv: &dyn KeyValueStore) -> Vec<WinRecord> {
    let raw = match kv.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "History unreadable, starting with empty history");
            return Vec::new();
        }
    };

    match decode_history(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "Stored history is corrupt, starting with empty history");
            Vec::new()
        }
    }
}

pub fn decode_history(raw: &str) -> StoreResult<Vec<WinRecord>> {
    serde_json::from_str(raw).map_err(StoreError::from)
}

pub fn encode_history(records: &[WinRecord]) -> StoreResult<String> {
    serde_json::to_string(records).map_err(StoreError::from)
}
