//! In-memory win history and last-play scalar, mirrored to durable storage.

use std::sync::Arc;

use lucky_core::record::WinRecord;
use lucky_core::types::Timestamp;

use crate::history::{encode_history, load_history, HISTORY_KEY};
use crate::kv::{KeyValueStore, KvWrite};
use crate::last_played::{encode_last_played, load_last_played, LAST_PLAYED_KEY};
use crate::StoreResult;

/// Owner of the win history and the `last_played_at` scalar.
///
/// Mutations update memory first and then write through to the backing
/// [`KeyValueStore`]. A failed write is returned to the caller but the
/// in-memory state keeps the change, so the session carries on with the
/// newest state and the next successful write catches storage up.
pub struct WinRecordStore {
    kv: Arc<dyn KeyValueStore>,
    records: Vec<WinRecord>,
    last_played_at: Option<Timestamp>,
}

impl WinRecordStore {
    /// Rebuild state from storage. Corrupt data degrades to empty.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let records = load_history(kv.as_ref());
        let last_played_at = load_last_played(kv.as_ref());

        tracing::info!(
            records = records.len(),
            last_played_at = ?last_played_at,
            "Win record store loaded"
        );

        Self {
            kv,
            records,
            last_played_at,
        }
    }

    /// Re-read the history from storage without touching this instance.
    pub fn load_all(&self) -> Vec<WinRecord> {
        load_history(self.kv.as_ref())
    }

    /// History, most recent first.
    pub fn records(&self) -> &[WinRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&WinRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_played_at(&self) -> Option<Timestamp> {
        self.last_played_at
    }

    /// Put `record` at the front of the history.
    pub fn append(&mut self, record: WinRecord) -> StoreResult<()> {
        self.records.insert(0, record);
        self.kv.set(HISTORY_KEY, &encode_history(&self.records)?)
    }

    /// Record a finished play: prepend `record` and stamp `last_played_at`
    /// with the record's timestamp, in one storage batch.
    pub fn commit_win(&mut self, record: WinRecord) -> StoreResult<()> {
        let played_at = record.timestamp;
        self.records.insert(0, record);
        self.last_played_at = Some(played_at);

        self.kv.write_batch(&[
            KvWrite::set(LAST_PLAYED_KEY, encode_last_played(played_at)),
            KvWrite::set(HISTORY_KEY, encode_history(&self.records)?),
        ])
    }

    /// Flag the record `id` as acknowledged by the ledger.
    ///
    /// Returns `Ok(false)` without writing when the record is gone (a reset
    /// raced the sync) or was already synced.
    pub fn mark_synced(&mut self, id: &str) -> StoreResult<bool> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if record.synced {
            return Ok(false);
        }

        record.synced = true;
        self.kv.set(HISTORY_KEY, &encode_history(&self.records)?)?;
        Ok(true)
    }

    /// Full reset: empty the history and forget the last play.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.records.clear();
        self.last_played_at = None;

        self.kv.write_batch(&[
            KvWrite::set(HISTORY_KEY, encode_history(&self.records)?),
            KvWrite::remove(LAST_PLAYED_KEY),
        ])
    }
}
