//! Local key-value storage for persisted documents.
//!
//! The browser version kept each document in `localStorage` under a fixed key.
//! Here a [`KeyValueStore`] plays that role: [`FileStore`] keeps one JSON file
//! per key inside a data directory and [`MemoryStore`] keeps everything in a map.
//!
//! [`Storage`] wraps a backend and implements the whole-document
//! read-modify-write cycle used by the stores. When the backend fails it falls
//! back to an in-memory copy for the rest of the session and reports the
//! failure once.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BackendError, StoreError};

/// Document key holding saved configurations (object keyed by name).
pub const CONFIGURATIONS_KEY: &str = "wow-keybinds";

/// Document key holding profiles (array of profiles).
pub const PROFILES_KEY: &str = "wowProfiles";

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete a key. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;
}

// ============================================================================
// Memory backend
// ============================================================================

/// Volatile backend, used for tests and as the degraded fallback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Infallible counterpart of [`KeyValueStore::set`].
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.values.remove(key);
        Ok(())
    }
}

// ============================================================================
// File backend
// ============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> BackendError {
        BackendError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Self::io_error(key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&temp_path, &path).map_err(|e| Self::io_error(key, e))?;
        log::debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

// ============================================================================
// Storage wrapper
// ============================================================================

/// Backend plus degraded-mode fallback.
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
    /// Set once the backend failed; from then on all reads and writes go here.
    fallback: Option<MemoryStore>,
    /// Read failure not yet reported; the next write returns it.
    pending_failure: Option<BackendError>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

impl Storage {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            fallback: None,
            pending_failure: None,
        }
    }

    /// Storage that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// True after the backend failed and the session runs in memory.
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    /// Read and parse a whole document, or `T::default()` if it was never written.
    ///
    /// A document that no longer parses is moved aside to `<key>.corrupt` and
    /// read as empty, so the next write replaces it.
    pub fn read_document<T>(&mut self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.read_raw(key) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(T::default()),
        };
        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(e) => {
                log::error!(
                    "Stored document '{}' is corrupt, starting over: {}",
                    key,
                    e
                );
                self.quarantine(key, &raw);
                Ok(T::default())
            }
        }
    }

    /// Serialize and replace a whole document.
    ///
    /// Returns `StorageUnavailable` once, for the write that hit the backend
    /// failure or the first write after a failed read. The document is kept
    /// in memory either way.
    pub fn write_document<T: Serialize>(&mut self, key: &str, document: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(document)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        if let Some(memory) = self.fallback.as_mut() {
            memory.insert(key, &json);
            return match self.pending_failure.take() {
                Some(e) => Err(StoreError::StorageUnavailable(e)),
                None => Ok(()),
            };
        }

        match self.backend.set(key, &json) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!(
                    "Storage write of '{}' failed, continuing in memory: {}",
                    key,
                    e
                );
                self.degrade().insert(key, &json);
                Err(StoreError::StorageUnavailable(e))
            }
        }
    }

    fn read_raw(&mut self, key: &str) -> Option<String> {
        if let Some(memory) = self.fallback.as_ref() {
            return memory.value(key);
        }

        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "Storage read of '{}' failed, continuing in memory: {}",
                    key,
                    e
                );
                let value = self.degrade().value(key);
                self.pending_failure = Some(e);
                value
            }
        }
    }

    /// Keep an unparseable document under `<key>.corrupt` for manual recovery.
    fn quarantine(&mut self, key: &str, raw: &str) {
        let backup = format!("{key}.corrupt");
        if let Some(memory) = self.fallback.as_mut() {
            memory.insert(&backup, raw);
            return;
        }
        if let Err(e) = self.backend.set(&backup, raw) {
            log::warn!("Could not keep a copy of corrupt '{}': {}", key, e);
        }
    }

    /// Switch to the in-memory fallback, seeding it with whatever the backend
    /// still returns for the known document keys.
    fn degrade(&mut self) -> &mut MemoryStore {
        if self.fallback.is_none() {
            let mut memory = MemoryStore::new();
            for key in [CONFIGURATIONS_KEY, PROFILES_KEY] {
                if let Ok(Some(value)) = self.backend.get(key) {
                    memory.insert(key, &value);
                }
            }
            self.fallback = Some(memory);
        }
        self.fallback.get_or_insert_with(MemoryStore::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    /// Backend whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), BackendError> {
            Err(BackendError::Rejected(key.to_string()))
        }

        fn remove(&mut self, key: &str) -> Result<(), BackendError> {
            Err(BackendError::Rejected(key.to_string()))
        }
    }

    /// Backend whose reads always fail.
    struct UnreadableStore;

    impl KeyValueStore for UnreadableStore {
        fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
            Err(BackendError::Io {
                key: key.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), BackendError> {
            Ok(())
        }

        fn remove(&mut self, _key: &str) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp = tempdir().unwrap();
        let mut store = FileStore::new(temp.path().join("data"));

        assert_eq!(store.get("doc").unwrap(), None);
        store.set("doc", "{\"a\":1}").unwrap();
        assert_eq!(store.get("doc").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(temp.path().join("data").join("doc.json").exists());

        store.remove("doc").unwrap();
        store.remove("doc").unwrap();
        assert_eq!(store.get("doc").unwrap(), None);
    }

    #[test]
    fn test_missing_document_reads_as_default() {
        let mut storage = Storage::in_memory();
        let doc: BTreeMap<String, String> = storage.read_document("missing").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_corrupt_document_is_moved_aside() {
        let temp = tempdir().unwrap();
        let mut backend = FileStore::new(temp.path());
        backend.set("doc", "not json").unwrap();
        let mut storage = Storage::new(backend);

        let doc: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert!(doc.is_empty());
        assert!(!storage.is_degraded());

        // The broken text is kept and the next write replaces the document
        let backup = fs::read_to_string(temp.path().join("doc.corrupt.json")).unwrap();
        assert_eq!(backup, "not json");
        let mut doc = BTreeMap::new();
        doc.insert("k".to_string(), "v".to_string());
        storage.write_document("doc", &doc).unwrap();
        let read: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert_eq!(read.len(), 1);
    }

    #[test]
    fn test_failed_read_keeps_write_in_memory() {
        let mut storage = Storage::new(UnreadableStore);

        let doc: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert!(doc.is_empty());
        assert!(storage.is_degraded());

        let mut doc = BTreeMap::new();
        doc.insert("k".to_string(), "v".to_string());
        let first = storage.write_document("doc", &doc);
        assert!(matches!(first, Err(StoreError::StorageUnavailable(_))));

        let read: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert_eq!(read.get("k").map(String::as_str), Some("v"));

        // Reported once
        storage.write_document("doc", &doc).unwrap();
    }

    #[test]
    fn test_memory_store_insert() {
        let mut memory = MemoryStore::new();
        memory.insert("doc", "{}");
        assert_eq!(memory.value("doc").as_deref(), Some("{}"));
        assert_eq!(memory.get("doc").unwrap().as_deref(), Some("{}"));
        assert_eq!(memory.value("missing"), None);
    }

    #[test]
    fn test_failed_write_degrades_once() {
        let mut storage = Storage::new(ReadOnlyStore);
        let mut doc = BTreeMap::new();
        doc.insert("k".to_string(), "v".to_string());

        let first = storage.write_document("doc", &doc);
        assert!(matches!(first, Err(StoreError::StorageUnavailable(_))));
        assert!(storage.is_degraded());

        // The failed write was kept in memory
        let read: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert_eq!(read.get("k").map(String::as_str), Some("v"));

        // Later writes succeed silently
        doc.insert("k2".to_string(), "v2".to_string());
        storage.write_document("doc", &doc).unwrap();
        let read: BTreeMap<String, String> = storage.read_document("doc").unwrap();
        assert_eq!(read.len(), 2);
    }
}
