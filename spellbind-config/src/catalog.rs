//! Spell catalog: expansion -> class -> ordered spell list.
//!
//! The catalog is read-only input. Document order is preserved so the first
//! expansion and the first class of an expansion can act as defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::types::Spell;

/// Reserved class name for spells available to every class of an expansion.
pub const GENERAL_CLASS: &str = "General";

/// Classes of one expansion, in document order.
pub type ExpansionSpells = IndexMap<String, Vec<Spell>>;

/// The full spell catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellCatalog {
    expansions: IndexMap<String, ExpansionSpells>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: SpellCatalog = serde_json::from_str(json)?;
        log::info!(
            "Loaded spell catalog with {} expansions",
            catalog.expansions.len()
        );
        Ok(catalog)
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Add (or replace) one class's spell list.
    pub fn insert_class(
        &mut self,
        expansion: impl Into<String>,
        class_name: impl Into<String>,
        spells: Vec<Spell>,
    ) {
        self.expansions
            .entry(expansion.into())
            .or_default()
            .insert(class_name.into(), spells);
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    pub fn has_expansion(&self, expansion: &str) -> bool {
        self.expansions.contains_key(expansion)
    }

    pub fn has_class(&self, expansion: &str, class_name: &str) -> bool {
        class_name != GENERAL_CLASS
            && self
                .expansions
                .get(expansion)
                .is_some_and(|classes| classes.contains_key(class_name))
    }

    /// Expansion names in document order.
    pub fn expansions(&self) -> Vec<&str> {
        self.expansions.keys().map(String::as_str).collect()
    }

    /// Selectable classes of an expansion, excluding [`GENERAL_CLASS`].
    pub fn classes(&self, expansion: &str) -> Vec<&str> {
        self.expansions
            .get(expansion)
            .map(|classes| {
                classes
                    .keys()
                    .filter(|name| name.as_str() != GENERAL_CLASS)
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First expansion, used when nothing is selected yet.
    pub fn default_expansion(&self) -> Option<&str> {
        self.expansions.keys().next().map(String::as_str)
    }

    /// First selectable class of an expansion.
    pub fn default_class(&self, expansion: &str) -> Option<&str> {
        self.classes(expansion).into_iter().next()
    }

    /// Spells every class of the expansion can use.
    pub fn general_spells(&self, expansion: &str) -> &[Spell] {
        self.class_list(expansion, GENERAL_CLASS)
    }

    /// Spells of one class (without the General ones).
    pub fn class_spells(&self, expansion: &str, class_name: &str) -> &[Spell] {
        if class_name == GENERAL_CLASS {
            return &[];
        }
        self.class_list(expansion, class_name)
    }

    /// General spells followed by class spells.
    pub fn available_spells(&self, expansion: &str, class_name: &str) -> Vec<&Spell> {
        self.general_spells(expansion)
            .iter()
            .chain(self.class_spells(expansion, class_name))
            .collect()
    }

    /// Case-insensitive name search over General and class spells.
    pub fn search(&self, expansion: &str, class_name: &str, term: &str) -> Vec<&Spell> {
        let needle = term.to_lowercase();
        self.available_spells(expansion, class_name)
            .into_iter()
            .filter(|spell| spell.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Stable element id of a spell, `spell-<expansion>-<class>-<index>`.
    ///
    /// Looks in the class list first, then in General.
    pub fn spell_id(&self, expansion: &str, class_name: &str, spell: &Spell) -> Option<String> {
        [class_name, GENERAL_CLASS].into_iter().find_map(|list| {
            self.class_list(expansion, list)
                .iter()
                .position(|candidate| candidate == spell)
                .map(|index| format_spell_id(expansion, list, index))
        })
    }

    fn class_list(&self, expansion: &str, class_name: &str) -> &[Spell] {
        self.expansions
            .get(expansion)
            .and_then(|classes| classes.get(class_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Build a spell element id; whitespace runs become `-`.
pub fn format_spell_id(expansion: &str, class_name: &str, index: usize) -> String {
    format!(
        "spell-{}-{}-{}",
        dash_whitespace(expansion),
        dash_whitespace(class_name),
        index
    )
}

fn dash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "Classic": {
            "General": [{"name": "Attack", "imageUrl": "attack.png"}],
            "Mage": [
                {"name": "Fireball", "imageUrl": "fb.png"},
                {"name": "Frostbolt", "imageUrl": "fr.png"}
            ],
            "Warrior": [{"name": "Charge", "imageUrl": "charge.png"}]
        },
        "The Burning Crusade": {
            "Death Knight": []
        }
    }"#;

    #[test]
    fn test_document_order_preserved() {
        let catalog = SpellCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.expansions(), vec!["Classic", "The Burning Crusade"]);
        assert_eq!(catalog.classes("Classic"), vec!["Mage", "Warrior"]);
        assert_eq!(catalog.default_expansion(), Some("Classic"));
        assert_eq!(catalog.default_class("Classic"), Some("Mage"));
    }

    #[test]
    fn test_general_is_not_a_class() {
        let catalog = SpellCatalog::from_json(CATALOG).unwrap();
        assert!(!catalog.has_class("Classic", GENERAL_CLASS));
        assert!(catalog.class_spells("Classic", GENERAL_CLASS).is_empty());
        assert_eq!(catalog.general_spells("Classic").len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive_and_includes_general() {
        let catalog = SpellCatalog::from_json(CATALOG).unwrap();
        let names: Vec<&str> = catalog
            .search("Classic", "Mage", "BOLT")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Frostbolt"]);

        let all = catalog.search("Classic", "Mage", "");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Attack");
    }

    #[test]
    fn test_spell_id() {
        let catalog = SpellCatalog::from_json(CATALOG).unwrap();
        let frostbolt = Spell::new("Frostbolt", "fr.png");
        assert_eq!(
            catalog.spell_id("Classic", "Mage", &frostbolt).as_deref(),
            Some("spell-Classic-Mage-1")
        );
        let attack = Spell::new("Attack", "attack.png");
        assert_eq!(
            catalog.spell_id("Classic", "Mage", &attack).as_deref(),
            Some("spell-Classic-General-0")
        );
        assert_eq!(
            format_spell_id("The Burning Crusade", "Death  Knight", 3),
            "spell-The-Burning-Crusade-Death-Knight-3"
        );
    }

    #[test]
    fn test_unknown_lookups_are_empty() {
        let catalog = SpellCatalog::from_json(CATALOG).unwrap();
        assert!(catalog.classes("Nope").is_empty());
        assert!(catalog.available_spells("Nope", "Mage").is_empty());
        assert_eq!(catalog.default_class("The Burning Crusade"), Some("Death Knight"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SpellCatalog::from_json("[1,2"),
            Err(CatalogError::Parse(_))
        ));
    }
}
