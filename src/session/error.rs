//! Errors surfaced by editing-session operations.

use spellbind_config::StoreError;
use thiserror::Error;

/// Errors returned by [`super::Session`] operations.
///
/// All of them are reported at the boundary where the user acted; the
/// session stays usable afterwards.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A configuration or profile store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The spell catalog has no such expansion.
    #[error("Unknown expansion '{0}'")]
    UnknownExpansion(String),

    /// The expansion has no such selectable class.
    #[error("Unknown class '{class_name}' for expansion '{expansion}'")]
    UnknownClass {
        expansion: String,
        class_name: String,
    },

    /// No spell of that name is available for the current selection.
    #[error("No spell named '{0}' for the selected class")]
    UnknownSpell(String),

    /// Custom labels can only be set on extra buttons.
    #[error("'{0}' is not an extra button")]
    NotAnExtraButton(String),

    /// Configurations and profiles need a non-blank name.
    #[error("A name is required")]
    EmptyName,
}

impl SessionError {
    /// True when the store fell back to memory; the operation itself took effect.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, SessionError::Store(StoreError::StorageUnavailable(_)))
    }
}
