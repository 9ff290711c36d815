//! Spell and persisted-keybind types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::modifier::ModifierLabel;

/// A bindable spell: display name plus icon URL.
///
/// Bindings copy the spell by value, so a bound spell survives catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Spell {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One bound spell as written into a saved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSpell {
    /// Catalog element id at save time (`spell-<expansion>-<class>-<index>`), if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_id: Option<String>,
    pub spell_name: String,
    pub spell_image_url: String,
}

impl StoredSpell {
    pub fn from_spell(spell: &Spell, spell_id: Option<String>) -> Self {
        Self {
            spell_id,
            spell_name: spell.name.clone(),
            spell_image_url: spell.image_url.clone(),
        }
    }

    pub fn to_spell(&self) -> Spell {
        Spell::new(self.spell_name.clone(), self.spell_image_url.clone())
    }
}

/// Bindings of one input id, keyed by modifier label.
pub type StoredInputBinds = BTreeMap<ModifierLabel, StoredSpell>;

/// Persisted keybinds: input id -> modifier label -> spell.
pub type StoredKeybinds = BTreeMap<String, StoredInputBinds>;

/// Extra-button input id -> user-supplied label.
pub type CustomLabels = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_json_field_names() {
        let spell = Spell::new("Fireball", "fb.png");
        let json = serde_json::to_value(&spell).unwrap();
        assert_eq!(json["name"], "Fireball");
        assert_eq!(json["imageUrl"], "fb.png");
    }

    #[test]
    fn test_stored_spell_omits_missing_id() {
        let stored = StoredSpell::from_spell(&Spell::new("Frostbolt", "fr.png"), None);
        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("spellId").is_none());
        assert_eq!(json["spellName"], "Frostbolt");
        assert_eq!(json["spellImageUrl"], "fr.png");
        assert_eq!(stored.to_spell(), Spell::new("Frostbolt", "fr.png"));
    }
}
