//! Modifier key types.
//!
//! Two spellings of the same eight modifier combinations exist in persisted data:
//!
//! - the binding-key suffix (`""`, `"Shift"`, `"CtrlShift"`, ...), appended to an
//!   input id to form a composite binding key
//! - the storage label (`normal`, `shift`, `ctrlShift`, ...), used as the inner
//!   key of the `keybinds` object in saved configurations
//!
//! Both are derived from [`ModifierSet`] using the canonical order Ctrl, Alt, Shift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Modifier
// ============================================================================

/// One of the three supported modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
}

impl Modifier {
    /// All modifiers in canonical composition order (Ctrl first, Shift last).
    pub const ALL: [Modifier; 3] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift];

    /// Lowercase name (`ctrl`, `alt`, `shift`).
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Alt => "alt",
            Modifier::Shift => "shift",
        }
    }

    /// Capitalized name used in suffixes and display labels.
    pub fn title(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when a string does not name a supported modifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown modifier '{0}' (expected shift, ctrl or alt)")]
pub struct UnknownModifier(pub String);

impl FromStr for Modifier {
    type Err = UnknownModifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ctrl" | "control" => Ok(Modifier::Ctrl),
            "alt" | "option" => Ok(Modifier::Alt),
            "shift" => Ok(Modifier::Shift),
            _ => Err(UnknownModifier(s.to_string())),
        }
    }
}

// ============================================================================
// ModifierSet
// ============================================================================

/// A set over `{ctrl, alt, shift}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierSet {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl ModifierSet {
    /// The empty set.
    pub const NONE: ModifierSet = ModifierSet {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Every combination, in the same order as [`ModifierLabel::ALL`].
    pub const ALL: [ModifierSet; 8] = [
        ModifierSet::from_flags(false, false, false),
        ModifierSet::from_flags(false, false, true),
        ModifierSet::from_flags(true, false, false),
        ModifierSet::from_flags(false, true, false),
        ModifierSet::from_flags(true, false, true),
        ModifierSet::from_flags(true, true, false),
        ModifierSet::from_flags(false, true, true),
        ModifierSet::from_flags(true, true, true),
    ];

    pub const fn from_flags(ctrl: bool, alt: bool, shift: bool) -> Self {
        Self { ctrl, alt, shift }
    }

    /// Build a set from any list of modifiers (order does not matter).
    pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
        let mut set = Self::NONE;
        for modifier in modifiers {
            set.insert(*modifier);
        }
        set
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Shift => self.shift,
        }
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.set(modifier, true);
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.set(modifier, false);
    }

    pub fn set(&mut self, modifier: Modifier, active: bool) {
        match modifier {
            Modifier::Ctrl => self.ctrl = active,
            Modifier::Alt => self.alt = active,
            Modifier::Shift => self.shift = active,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }

    /// Active modifiers in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }

    /// Binding-key suffix, e.g. `"CtrlShift"`; empty when no modifier is active.
    pub fn suffix(&self) -> String {
        self.iter().map(Modifier::title).collect()
    }

    /// Human-readable prefix, e.g. `"Ctrl + Shift + "`; empty when no modifier is active.
    pub fn display_prefix(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = self.iter().map(Modifier::title).collect();
        format!("{} + ", names.join(" + "))
    }

    /// Parse a binding-key suffix. Only the eight canonical spellings are accepted.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|set| set.suffix() == suffix)
    }

    /// Storage label for this combination.
    pub fn label(&self) -> ModifierLabel {
        ModifierLabel::from(*self)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffix())
    }
}

// ============================================================================
// ModifierLabel
// ============================================================================

/// Storage label naming one modifier combination inside a saved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModifierLabel {
    Normal,
    Shift,
    Ctrl,
    Alt,
    CtrlShift,
    CtrlAlt,
    AltShift,
    CtrlAltShift,
}

impl ModifierLabel {
    pub const ALL: [ModifierLabel; 8] = [
        ModifierLabel::Normal,
        ModifierLabel::Shift,
        ModifierLabel::Ctrl,
        ModifierLabel::Alt,
        ModifierLabel::CtrlShift,
        ModifierLabel::CtrlAlt,
        ModifierLabel::AltShift,
        ModifierLabel::CtrlAltShift,
    ];

    /// The label as it appears in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ModifierLabel::Normal => "normal",
            ModifierLabel::Shift => "shift",
            ModifierLabel::Ctrl => "ctrl",
            ModifierLabel::Alt => "alt",
            ModifierLabel::CtrlShift => "ctrlShift",
            ModifierLabel::CtrlAlt => "ctrlAlt",
            ModifierLabel::AltShift => "altShift",
            ModifierLabel::CtrlAltShift => "ctrlAltShift",
        }
    }

    pub fn modifiers(self) -> ModifierSet {
        match self {
            ModifierLabel::Normal => ModifierSet::from_flags(false, false, false),
            ModifierLabel::Shift => ModifierSet::from_flags(false, false, true),
            ModifierLabel::Ctrl => ModifierSet::from_flags(true, false, false),
            ModifierLabel::Alt => ModifierSet::from_flags(false, true, false),
            ModifierLabel::CtrlShift => ModifierSet::from_flags(true, false, true),
            ModifierLabel::CtrlAlt => ModifierSet::from_flags(true, true, false),
            ModifierLabel::AltShift => ModifierSet::from_flags(false, true, true),
            ModifierLabel::CtrlAltShift => ModifierSet::from_flags(true, true, true),
        }
    }
}

impl From<ModifierSet> for ModifierLabel {
    fn from(set: ModifierSet) -> Self {
        match (set.ctrl, set.alt, set.shift) {
            (false, false, false) => ModifierLabel::Normal,
            (false, false, true) => ModifierLabel::Shift,
            (true, false, false) => ModifierLabel::Ctrl,
            (false, true, false) => ModifierLabel::Alt,
            (true, false, true) => ModifierLabel::CtrlShift,
            (true, true, false) => ModifierLabel::CtrlAlt,
            (false, true, true) => ModifierLabel::AltShift,
            (true, true, true) => ModifierLabel::CtrlAltShift,
        }
    }
}

impl From<ModifierLabel> for ModifierSet {
    fn from(label: ModifierLabel) -> Self {
        label.modifiers()
    }
}

impl fmt::Display for ModifierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_uses_canonical_order() {
        let set = ModifierSet::from_modifiers(&[Modifier::Shift, Modifier::Ctrl]);
        assert_eq!(set.suffix(), "CtrlShift");

        let all = ModifierSet::from_modifiers(&[Modifier::Shift, Modifier::Alt, Modifier::Ctrl]);
        assert_eq!(all.suffix(), "CtrlAltShift");
        assert_eq!(ModifierSet::NONE.suffix(), "");
    }

    #[test]
    fn test_display_prefix() {
        let set = ModifierSet::from_modifiers(&[Modifier::Shift, Modifier::Ctrl]);
        assert_eq!(set.display_prefix(), "Ctrl + Shift + ");
        assert_eq!(ModifierSet::NONE.display_prefix(), "");
    }

    #[test]
    fn test_all_suffixes_are_the_eight_variants() {
        let suffixes: Vec<String> = ModifierSet::ALL.iter().map(|s| s.suffix()).collect();
        assert_eq!(
            suffixes,
            vec![
                "", "Shift", "Ctrl", "Alt", "CtrlShift", "CtrlAlt", "AltShift", "CtrlAltShift"
            ]
        );
    }

    #[test]
    fn test_label_translation_is_lossless() {
        for (set, label) in ModifierSet::ALL.iter().zip(ModifierLabel::ALL) {
            assert_eq!(set.label(), label);
            assert_eq!(ModifierSet::from(label), *set);
            assert_eq!(ModifierSet::from_suffix(&set.suffix()), Some(*set));
        }
    }

    #[test]
    fn test_label_json_spelling() {
        let json = serde_json::to_string(&ModifierLabel::CtrlAltShift).unwrap();
        assert_eq!(json, "\"ctrlAltShift\"");
        let parsed: ModifierLabel = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, ModifierLabel::Normal);
    }

    #[test]
    fn test_from_suffix_rejects_non_canonical() {
        assert_eq!(ModifierSet::from_suffix("ShiftCtrl"), None);
        assert_eq!(ModifierSet::from_suffix("ctrl"), None);
    }

    #[test]
    fn test_modifier_from_str() {
        assert_eq!("Control".parse::<Modifier>(), Ok(Modifier::Ctrl));
        assert_eq!("shift".parse::<Modifier>(), Ok(Modifier::Shift));
        assert!("super".parse::<Modifier>().is_err());
    }
}
