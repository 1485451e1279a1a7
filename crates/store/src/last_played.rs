//! Encoding of the last-play timestamp under [`LAST_PLAYED_KEY`].
//!
//! Stored as a decimal epoch-millisecond integer.

use chrono::{DateTime, Utc};
use lucky_core::types::Timestamp;

use crate::kv::KeyValueStore;

pub const LAST_PLAYED_KEY: &str = "lucky_scratch_last_played_timestamp";

/// Read the last-play timestamp. Absent or malformed values read as `None`.
pub fn load_last_played(kv: &dyn KeyValueStore) -> Option<Timestamp> {
    let raw = match kv.get(LAST_PLAYED_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, "Last-played timestamp unreadable, treating as never played");
            return None;
        }
    };

    let decoded = decode_last_played(&raw);
    if decoded.is_none() {
        tracing::warn!(raw = %raw, "Last-played timestamp is malformed, treating as never played");
    }
    decoded
}

pub fn decode_last_played(raw: &str) -> Option<Timestamp> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

pub fn encode_last_played(at: Timestamp) -> String {
    at.timestamp_millis().to_string()
}
