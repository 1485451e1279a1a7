//! In-memory key-value backend.
//!
//! Deterministic and test-friendly; nothing survives the process.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::kv::{apply_batch, KeyValueStore, KvWrite};
use crate::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write_batch(&self, batch: &[KvWrite]) -> StoreResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))?;
        apply_batch(&mut guard, batch);
        Ok(())
    }
}
