//! The keybind map: [`BindingKey`] -> bound [`Spell`].
//!
//! Spells are held by value. Lookup is exact; falling back to the unmodified
//! binding is a display concern handled in [`crate::display`].

use spellbind_config::{ModifierLabel, ModifierSet, Spell, StoredKeybinds, StoredSpell};
use std::collections::HashMap;

use crate::input::{BindingKey, InputId};

/// Mapping from binding key to bound spell. A key maps to at most one spell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeybindMap {
    bindings: HashMap<BindingKey, Spell>,
}

impl KeybindMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a spell, replacing whatever the key held.
    ///
    /// Returns the previously bound spell so the caller can return it to the
    /// available pool.
    pub fn bind(&mut self, key: BindingKey, spell: Spell) -> Option<Spell> {
        log::debug!("Bind {} -> {}", key, spell);
        self.bindings.insert(key, spell)
    }

    /// Remove a binding. Unbinding an unbound key is a no-op.
    pub fn unbind(&mut self, key: &BindingKey) -> Option<Spell> {
        let removed = self.bindings.remove(key);
        if removed.is_some() {
            log::debug!("Unbind {}", key);
        }
        removed
    }

    /// Exact lookup, no fallback.
    pub fn lookup(&self, key: &BindingKey) -> Option<&Spell> {
        self.bindings.get(key)
    }

    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Remove every binding at once, returning how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = std::mem::take(&mut self.bindings).len();
        log::debug!("Cleared {} bindings", removed);
        removed
    }

    /// Replace the whole map in one step.
    pub fn replace_all(&mut self, other: KeybindMap) {
        self.bindings = other.bindings;
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&BindingKey, &Spell)> {
        self.bindings.iter()
    }

    /// Bindings sorted by input id, then modifier label.
    pub fn sorted(&self) -> Vec<(&BindingKey, &Spell)> {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            a.input
                .cmp(&b.input)
                .then_with(|| a.label().cmp(&b.label()))
        });
        entries
    }

    /// All bindings of one input, in storage-label order.
    pub fn bindings_for_input(&self, input: &InputId) -> Vec<(ModifierSet, &Spell)> {
        ModifierSet::ALL
            .into_iter()
            .filter_map(|modifiers| {
                self.bindings
                    .get(&BindingKey::new(input.clone(), modifiers))
                    .map(|spell| (modifiers, spell))
            })
            .collect()
    }

    /// True if the spell is bound to any key.
    pub fn is_bound(&self, spell: &Spell) -> bool {
        self.bindings.values().any(|bound| bound == spell)
    }

    /// Persisted form without spell ids.
    pub fn to_snapshot(&self) -> StoredKeybinds {
        self.to_snapshot_with(|_| None)
    }

    /// Persisted form, asking `spell_id` for each bound spell's catalog id.
    pub fn to_snapshot_with<F>(&self, mut spell_id: F) -> StoredKeybinds
    where
        F: FnMut(&Spell) -> Option<String>,
    {
        let mut snapshot = StoredKeybinds::new();
        for (key, spell) in &self.bindings {
            snapshot
                .entry(key.input.as_str().to_string())
                .or_default()
                .insert(key.label(), StoredSpell::from_spell(spell, spell_id(spell)));
        }
        snapshot
    }

    /// Rebuild a map from its persisted form.
    pub fn from_snapshot(snapshot: &StoredKeybinds) -> Self {
        let mut map = Self::new();
        for (input, binds) in snapshot {
            for (label, stored) in binds {
                let key = BindingKey::new(InputId::new(input), ModifierSet::from(*label));
                map.bindings.insert(key, stored.to_spell());
            }
        }
        map
    }

    /// Storage labels bound for one input.
    pub fn labels_for_input(&self, input: &InputId) -> Vec<ModifierLabel> {
        self.bindings_for_input(input)
            .into_iter()
            .map(|(modifiers, _)| modifiers.label())
            .collect()
    }
}

impl FromIterator<(BindingKey, Spell)> for KeybindMap {
    fn from_iter<I: IntoIterator<Item = (BindingKey, Spell)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireball() -> Spell {
        Spell::new("Fireball", "fb.png")
    }

    fn frostbolt() -> Spell {
        Spell::new("Frostbolt", "fr.png")
    }

    const CTRL: ModifierSet = ModifierSet::from_flags(true, false, false);

    #[test]
    fn test_bind_overwrites_and_returns_previous() {
        let mut map = KeybindMap::new();
        let key = BindingKey::unmodified("f");
        assert_eq!(map.bind(key.clone(), fireball()), None);
        assert_eq!(map.bind(key.clone(), frostbolt()), Some(fireball()));
        assert_eq!(map.lookup(&key), Some(&frostbolt()));
        assert_eq!(map.len(), 1);
        assert!(!map.is_bound(&fireball()));
    }

    #[test]
    fn test_unbind_absent_is_noop() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::unmodified("q"), fireball());
        let before = map.clone();
        assert_eq!(map.unbind(&BindingKey::unmodified("w")), None);
        assert_eq!(map, before);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::unmodified("f"), fireball());
        assert!(map.lookup(&BindingKey::new("f", CTRL)).is_none());
    }

    #[test]
    fn test_clear_all_twice() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::unmodified("f"), fireball());
        map.bind(BindingKey::new("f", CTRL), frostbolt());
        assert_eq!(map.clear_all(), 2);
        assert!(map.is_empty());
        assert_eq!(map.clear_all(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_bindings_for_input_in_label_order() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::new("f", CTRL), frostbolt());
        map.bind(BindingKey::unmodified("f"), fireball());
        map.bind(BindingKey::unmodified("g"), fireball());

        let labels = map.labels_for_input(&InputId::new("f"));
        assert_eq!(labels, vec![ModifierLabel::Normal, ModifierLabel::Ctrl]);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::unmodified("f"), fireball());
        map.bind(
            BindingKey::new("mouse-left", ModifierSet::from_flags(false, true, true)),
            frostbolt(),
        );

        let snapshot = map.to_snapshot();
        assert_eq!(snapshot["f"][&ModifierLabel::Normal].spell_name, "Fireball");
        assert_eq!(
            snapshot["mouse-left"][&ModifierLabel::AltShift].spell_image_url,
            "fr.png"
        );
        assert_eq!(KeybindMap::from_snapshot(&snapshot), map);
    }

    #[test]
    fn test_snapshot_with_spell_ids() {
        let mut map = KeybindMap::new();
        map.bind(BindingKey::unmodified("f"), fireball());
        let snapshot = map.to_snapshot_with(|spell| Some(format!("id-{}", spell.name)));
        assert_eq!(
            snapshot["f"][&ModifierLabel::Normal].spell_id.as_deref(),
            Some("id-Fireball")
        );
    }
}
