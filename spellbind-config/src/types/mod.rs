//! Shared value types used by the persisted documents and the keybinding crate.

mod modifier;
mod spell;

pub use modifier::{Modifier, ModifierLabel, ModifierSet, UnknownModifier};
pub use spell::{CustomLabels, Spell, StoredInputBinds, StoredKeybinds, StoredSpell};
