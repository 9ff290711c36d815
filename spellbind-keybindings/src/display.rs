//! Display resolution for one input.
//!
//! When the active modifier combination has no binding on an input, the view
//! shows the unmodified binding instead, without a modifier prefix.

use spellbind_config::{CustomLabels, ModifierSet, Spell};

use crate::input::{BindingKey, InputId};
use crate::keybind_map::KeybindMap;

/// What an input should show for the active modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDisplay<'a> {
    /// Spell to show, if any
    pub spell: Option<&'a Spell>,
    /// Modifier prefix to show before the spell name (`"Ctrl + "`); empty on fallback
    pub prefix: String,
    /// True when `spell` is the unmodified binding shown in place of a missing modified one
    pub is_fallback: bool,
}

impl KeyDisplay<'_> {
    /// Text for the spell slot, e.g. `"Ctrl + Frostbolt"`.
    pub fn text(&self) -> Option<String> {
        self.spell
            .map(|spell| format!("{}{}", self.prefix, spell.name))
    }
}

/// Resolve what `input` displays with `modifiers` active.
pub fn resolve_display<'a>(
    map: &'a KeybindMap,
    input: &InputId,
    modifiers: ModifierSet,
) -> KeyDisplay<'a> {
    let key = BindingKey::new(input.clone(), modifiers);
    if let Some(spell) = map.lookup(&key) {
        return KeyDisplay {
            spell: Some(spell),
            prefix: modifiers.display_prefix(),
            is_fallback: false,
        };
    }

    let fallback = if modifiers.is_empty() {
        None
    } else {
        map.lookup(&key.base())
    };

    KeyDisplay {
        spell: fallback,
        prefix: String::new(),
        is_fallback: fallback.is_some(),
    }
}

/// Caption of an input: its custom label if set (extra buttons only), else
/// the layout default.
pub fn input_caption(input: &InputId, custom_labels: &CustomLabels) -> String {
    if input.is_extra()
        && let Some(label) = custom_labels.get(input.as_str())
        && !label.is_empty()
    {
        return label.clone();
    }
    input.default_label()
}
