//! String-valued key-value storage contract.

use crate::StoreResult;

/// One write in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl KvWrite {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        KvWrite::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        KvWrite::Remove { key: key.into() }
    }
}

/// Durable string key-value storage.
///
/// Implementations must apply a batch all-or-nothing from the caller's
/// point of view: either every write in it is visible afterwards, or none
/// is and an error is returned.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Absent keys are `Ok(None)`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Apply a batch of writes.
    fn write_batch(&self, batch: &[KvWrite]) -> StoreResult<()>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.write_batch(&[KvWrite::set(key, value)])
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.write_batch(&[KvWrite::remove(key)])
    }
}

/// Apply a batch to an in-memory map.
pub(crate) fn apply_batch(entries: &mut std::collections::HashMap<String, String>, batch: &[KvWrite]) {
    for write in batch {
        match write {
            KvWrite::Set { key, value } => {
                entries.insert(key.clone(), value.clone());
            }
            KvWrite::Remove { key } => {
                entries.remove(key);
            }
        }
    }
}
