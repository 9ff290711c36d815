//! Application settings file.
//!
//! Settings live in `~/.config/spellbind/settings.yaml` and cover where the
//! persisted documents and the spell catalog are found, plus logging and a few
//! session defaults. The file is created with defaults on first load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log level for debug logging to file.
///
/// Environment variable `RUST_LOG` and the `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// User settings for the keybind editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the persisted documents (default: `~/.local/share/spellbind`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Spell catalog JSON (default: `spells.json` inside the data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// File log verbosity
    pub log_level: LogLevel,

    /// Expansion selected when a session starts (default: first in catalog)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expansion: Option<String>,

    /// Profile re-activated when a session starts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_profile: Option<String>,

    /// Directory exported configuration files are written to (default: current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default location, creating the file if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from a specific file, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Settings path: {:?}", path);

        if !path.exists() {
            log::info!("Settings file not found, creating default at {:?}", path);
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize settings")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write settings to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace settings file {:?}", path))?;
        Ok(())
    }

    /// Get the settings file path (using XDG convention)
    pub fn settings_path() -> PathBuf {
        Self::config_dir().join("settings.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("spellbind")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("spellbind")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Directory for persisted configurations and profiles.
    pub fn effective_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return expand_home_dir(dir);
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("spellbind"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Spell catalog file.
    pub fn effective_catalog_path(&self) -> PathBuf {
        match &self.catalog_path {
            Some(path) => expand_home_dir(path),
            None => self.effective_data_dir().join("spells.json"),
        }
    }

    /// Directory exports are written to.
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(expand_home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home_dir(path: &Path) -> PathBuf {
    if let Ok(suffix) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(suffix);
    }
    path.to_path_buf()
}
