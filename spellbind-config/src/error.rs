//! Typed error variants for the spellbind-config crate.
//!
//! Every store operation returns [`StoreError`], so the dialog that triggered
//! it (save, load, import, share) can report a message and carry on. None of
//! these are fatal to the editing session.

use thiserror::Error;

/// Errors surfaced by the configuration and profile stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A named configuration or profile does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was looked up ("configuration" or "profile").
        kind: &'static str,
        /// The requested name.
        name: String,
    },

    /// An imported file or stored document is not a valid configuration.
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),

    /// A share string could not be decoded.
    #[error("Invalid share string: {0}")]
    InvalidShareString(String),

    /// The persistent backend could not be read or written. The store has
    /// switched to in-memory operation for the rest of the session; the write
    /// that reported this was still applied in memory.
    #[error("Storage unavailable, changes are kept in memory only: {0}")]
    StorageUnavailable(#[source] BackendError),
}

impl StoreError {
    pub(crate) fn configuration_not_found(name: &str) -> Self {
        StoreError::NotFound {
            kind: "configuration",
            name: name.to_string(),
        }
    }

    pub(crate) fn profile_not_found(name: &str) -> Self {
        StoreError::NotFound {
            kind: "profile",
            name: name.to_string(),
        }
    }

    /// True for errors the user fixes by retrying with different input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidFormat(_) | StoreError::InvalidShareString(_)
        )
    }
}

/// Failure inside a [`crate::storage::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend refuses writes (read-only medium, quota exhausted, ...).
    #[error("storage rejected write of '{0}'")]
    Rejected(String),
}

/// Errors loading the spell catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read spell catalog '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Spell catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
