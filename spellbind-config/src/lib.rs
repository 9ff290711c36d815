//! Data and persistence layer for the spellbind keybind editor.
//!
//! This crate provides everything that outlives a single editing session:
//!
//! - The spell catalog (expansion -> class -> spells)
//! - Modifier and storage-label vocabulary shared with the keybinding crate
//! - Named keybind configurations with export, import and share strings
//! - Profiles that accumulate keybinds for several (expansion, class) pairs
//! - Key-value storage backends with in-memory fallback
//! - The application settings file

pub mod catalog;
pub mod configuration;
pub mod error;
pub mod profile_types;
pub mod settings;
pub mod share;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use catalog::{GENERAL_CLASS, SpellCatalog, format_spell_id};
pub use configuration::{
    Configuration, ConfigurationBuilder, ConfigurationStore, EXPORT_FILE_SUFFIX,
    ExportedConfiguration, export_file_name,
};
pub use error::{BackendError, CatalogError, StoreError};
pub use profile_types::{Profile, ProfileData, ProfileEntry, ProfileManager, ProfileStore};
pub use settings::{LogLevel, Settings};
pub use share::{decode_share_string, encode_share_string};
pub use storage::{
    CONFIGURATIONS_KEY, FileStore, KeyValueStore, MemoryStore, PROFILES_KEY, Storage,
};
pub use types::{
    CustomLabels, Modifier, ModifierLabel, ModifierSet, Spell, StoredInputBinds, StoredKeybinds,
    StoredSpell, UnknownModifier,
};
