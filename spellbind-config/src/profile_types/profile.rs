//! Core `Profile` struct.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{CustomLabels, StoredKeybinds};

/// Keybinds and labels saved for one (expansion, class) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    #[serde(default)]
    pub keybinds: StoredKeybinds,

    #[serde(default)]
    pub custom_labels: CustomLabels,
}

impl ProfileEntry {
    pub fn new(keybinds: StoredKeybinds, custom_labels: CustomLabels) -> Self {
        Self {
            keybinds,
            custom_labels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keybinds.is_empty() && self.custom_labels.is_empty()
    }
}

/// expansion -> class -> entry
pub type ProfileData = BTreeMap<String, BTreeMap<String, ProfileEntry>>;

/// A named profile accumulating keybinds for many (expansion, class) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name, also the profile's identity
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub data: ProfileData,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data: ProfileData::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Entry for one (expansion, class) pair, if the profile has one.
    pub fn entry(&self, expansion: &str, class_name: &str) -> Option<&ProfileEntry> {
        self.data.get(expansion)?.get(class_name)
    }

    /// Replace one (expansion, class) branch, leaving every other branch as is.
    pub fn set_entry(
        &mut self,
        expansion: impl Into<String>,
        class_name: impl Into<String>,
        entry: ProfileEntry,
    ) {
        self.data
            .entry(expansion.into())
            .or_default()
            .insert(class_name.into(), entry);
    }

    /// Remove one branch; drops the expansion level once it is empty.
    pub fn remove_entry(&mut self, expansion: &str, class_name: &str) -> Option<ProfileEntry> {
        let classes = self.data.get_mut(expansion)?;
        let removed = classes.remove(class_name);
        if classes.is_empty() {
            self.data.remove(expansion);
        }
        removed
    }

    /// All (expansion, class) pairs with saved data.
    pub fn branches(&self) -> Vec<(&str, &str)> {
        self.data
            .iter()
            .flat_map(|(expansion, classes)| {
                classes
                    .keys()
                    .map(move |class_name| (expansion.as_str(), class_name.as_str()))
            })
            .collect()
    }
}
