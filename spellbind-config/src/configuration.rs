//! Named keybind configurations and their store.
//!
//! A [`Configuration`] is a snapshot of one (expansion, class) keybind layout.
//! [`ConfigurationStore`] keeps all of them in a single document keyed by name
//! (`wow-keybinds`) and offers export/import as JSON files and share strings.
//!
//! Every operation re-reads the whole document, changes one entry and writes
//! the whole document back. Concurrent writers are not coordinated; the last
//! write wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::share;
use crate::storage::{CONFIGURATIONS_KEY, Storage};
use crate::types::{CustomLabels, StoredKeybinds};

/// Suffix appended to exported file names.
pub const EXPORT_FILE_SUFFIX: &str = "_keybinds.json";

/// A saved keybind configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Unique, user-chosen name; saving under an existing name overwrites it
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub expansion: String,

    #[serde(default, rename = "class")]
    pub class_name: String,

    /// Creation/update time, ISO-8601 in JSON
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    pub keybinds: StoredKeybinds,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_labels: CustomLabels,
}

impl Configuration {
    /// Start building a configuration with the given name.
    pub fn builder(name: impl Into<String>) -> ConfigurationBuilder {
        ConfigurationBuilder {
            configuration: Configuration {
                name: name.into(),
                description: String::new(),
                expansion: String::new(),
                class_name: String::new(),
                timestamp: Utc::now(),
                keybinds: StoredKeybinds::new(),
                custom_labels: CustomLabels::new(),
            },
        }
    }

    /// Parse and validate one configuration object.
    ///
    /// `name` (non-empty string) and `keybinds` (object) are required; the
    /// remaining fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| StoreError::InvalidFormat(format!("not valid JSON: {e}")))?;

        let object = value
            .as_object()
            .ok_or_else(|| StoreError::InvalidFormat("expected a JSON object".to_string()))?;

        match object.get("name").and_then(|n| n.as_str()) {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                return Err(StoreError::InvalidFormat(
                    "missing required field 'name'".to_string(),
                ));
            }
        }
        if !object.get("keybinds").is_some_and(|k| k.is_object()) {
            return Err(StoreError::InvalidFormat(
                "missing required field 'keybinds'".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| StoreError::InvalidFormat(e.to_string()))
    }

    /// Pretty-printed JSON, as written to exported files.
    pub fn to_pretty_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::InvalidFormat(e.to_string()))
    }

    /// Number of bound (input, modifier) pairs.
    pub fn binding_count(&self) -> usize {
        self.keybinds.values().map(|binds| binds.len()).sum()
    }
}

/// Builder for [`Configuration`].
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.configuration.description = description.into();
        self
    }

    pub fn expansion(mut self, expansion: impl Into<String>) -> Self {
        self.configuration.expansion = expansion.into();
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.configuration.class_name = class_name.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.configuration.timestamp = timestamp;
        self
    }

    pub fn keybinds(mut self, keybinds: StoredKeybinds) -> Self {
        self.configuration.keybinds = keybinds;
        self
    }

    pub fn custom_labels(mut self, custom_labels: CustomLabels) -> Self {
        self.configuration.custom_labels = custom_labels;
        self
    }

    pub fn build(self) -> Configuration {
        self.configuration
    }
}

/// An exported configuration ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedConfiguration {
    pub file_name: String,
    pub contents: String,
}

impl ExportedConfiguration {
    /// Write the export into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// File name for an exported configuration: every character other than an
/// ASCII letter or digit becomes `_`.
pub fn export_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{sanitized}{EXPORT_FILE_SUFFIX}")
}

type ConfigurationDocument = BTreeMap<String, Configuration>;

/// Persistent collection of named configurations.
#[derive(Debug)]
pub struct ConfigurationStore {
    storage: Storage,
    /// Name of the configuration last saved or loaded
    current: Option<String>,
}

impl ConfigurationStore {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(Storage::in_memory())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.storage.is_degraded()
    }

    fn read(&mut self) -> Result<ConfigurationDocument, StoreError> {
        self.storage.read_document(CONFIGURATIONS_KEY)
    }

    fn write(&mut self, document: &ConfigurationDocument) -> Result<(), StoreError> {
        self.storage.write_document(CONFIGURATIONS_KEY, document)
    }

    /// Save (or overwrite) a configuration under its own name.
    pub fn save(&mut self, configuration: Configuration) -> Result<(), StoreError> {
        let mut document = self.read()?;
        let name = configuration.name.clone();
        log::info!(
            "Saving configuration '{}' ({} bindings)",
            name,
            configuration.binding_count()
        );
        document.insert(name.clone(), configuration);
        self.current = Some(name);
        self.write(&document)
    }

    /// Fetch a configuration for the caller to apply and mark it current.
    pub fn load(&mut self, name: &str) -> Result<Configuration, StoreError> {
        let configuration = self.fetch(name)?;
        self.set_current(Some(name));
        Ok(configuration)
    }

    /// Like [`ConfigurationStore::load`], but leaves the current name alone so
    /// the caller can mark it once the configuration was accepted.
    pub fn fetch(&mut self, name: &str) -> Result<Configuration, StoreError> {
        self.get(name)?
            .ok_or_else(|| StoreError::configuration_not_found(name))
    }

    pub fn set_current(&mut self, name: Option<&str>) {
        self.current = name.map(str::to_string);
    }

    /// Fetch a configuration without marking it current.
    pub fn get(&mut self, name: &str) -> Result<Option<Configuration>, StoreError> {
        Ok(self.read()?.remove(name))
    }

    /// Remove a configuration. Removing a missing name is not an error.
    ///
    /// Returns whether anything was removed.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut document = self.read()?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
        }
        if document.remove(name).is_none() {
            return Ok(false);
        }
        log::info!("Deleted configuration '{}'", name);
        self.write(&document)?;
        Ok(true)
    }

    /// All configurations, ordered by name.
    pub fn list(&mut self) -> Result<Vec<Configuration>, StoreError> {
        Ok(self.read()?.into_values().collect())
    }

    /// Configuration names, ordered.
    pub fn names(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.into_keys().collect())
    }

    /// Export one configuration as a pretty-printed JSON file.
    pub fn export(&mut self, name: &str) -> Result<ExportedConfiguration, StoreError> {
        let configuration = self
            .get(name)?
            .ok_or_else(|| StoreError::configuration_not_found(name))?;
        Ok(ExportedConfiguration {
            file_name: export_file_name(&configuration.name),
            contents: configuration.to_pretty_json()?,
        })
    }

    /// Import the contents of an exported file, overwriting any configuration
    /// with the same embedded name. Nothing is stored if validation fails.
    pub fn import(&mut self, contents: &str) -> Result<Configuration, StoreError> {
        let configuration = Configuration::from_json(contents)?;
        log::info!("Importing configuration '{}'", configuration.name);
        self.store_imported(configuration)
    }

    /// Share string of a saved configuration.
    pub fn share_string(&mut self, name: &str) -> Result<String, StoreError> {
        let configuration = self
            .get(name)?
            .ok_or_else(|| StoreError::configuration_not_found(name))?;
        share::encode_share_string(&configuration)
    }

    /// Decode a share string and store the configuration it carries.
    pub fn import_share_string(&mut self, share: &str) -> Result<Configuration, StoreError> {
        let configuration = share::decode_share_string(share)?;
        log::info!(
            "Importing configuration '{}' from share string",
            configuration.name
        );
        self.store_imported(configuration)
    }

    fn store_imported(&mut self, configuration: Configuration) -> Result<Configuration, StoreError> {
        let mut document = self.read()?;
        document.insert(configuration.name.clone(), configuration.clone());
        self.write(&document)?;
        Ok(configuration)
    }
}
