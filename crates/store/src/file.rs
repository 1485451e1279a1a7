//! Single-file JSON key-value backend.
//!
//! All entries live in one JSON object on disk. Every batch rewrites the
//! whole file through a temporary sibling and an atomic rename, so a crash
//! mid-write leaves the previous contents intact. The map is small (two
//! keys in practice), which keeps the full rewrite cheap.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::kv::{apply_batch, KeyValueStore, KvWrite};
use crate::{StoreError, StoreResult};

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is a fresh start. A file that cannot be parsed is
    /// logged and treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Store file is corrupt, starting from an empty store"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "File store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let guard = self
            .entries
            .read()
            .map_err(|_| StoreError::Backend("file store lock poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write_batch(&self, batch: &[KvWrite]) -> StoreResult<()> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| StoreError::Backend("file store lock poisoned".to_string()))?;

        // Stage on a copy so a failed disk write leaves memory untouched.
        let mut staged = guard.clone();
        apply_batch(&mut staged, batch);
        self.persist(&staged)?;
        *guard = staged;
        Ok(())
    }
}
