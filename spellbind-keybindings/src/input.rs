//! Input identifiers and composite binding keys.
//!
//! An [`InputId`] names one bindable input of the layout (`"f"`, `"numpad-3"`,
//! `"mouse-left"`, `"extra-7"`). A [`BindingKey`] pairs it with a modifier
//! combination; its string form appends the modifier suffix (`"fCtrlShift"`).

use spellbind_config::{ModifierLabel, ModifierSet};
use std::fmt;
use std::str::FromStr;

use crate::parser::ParseError;

/// Number of extra (auxiliary) buttons, `extra-1` to `extra-16`.
pub const EXTRA_BUTTON_COUNT: u8 = 16;

/// Keyboard layout inputs with their default captions.
pub const KEYBOARD_INPUTS: &[(&str, &str)] = &[
    ("esc", "Esc"),
    ("f1", "F1"),
    ("f2", "F2"),
    ("f3", "F3"),
    ("f4", "F4"),
    ("f5", "F5"),
    ("f6", "F6"),
    ("f7", "F7"),
    ("f8", "F8"),
    ("f9", "F9"),
    ("f10", "F10"),
    ("f11", "F11"),
    ("f12", "F12"),
    ("tilde", "~"),
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("0", "0"),
    ("minus", "-"),
    ("equals", "="),
    ("backspace", "Backspace"),
    ("tab", "Tab"),
    ("q", "Q"),
    ("w", "W"),
    ("e", "E"),
    ("r", "R"),
    ("t", "T"),
    ("y", "Y"),
    ("u", "U"),
    ("i", "I"),
    ("o", "O"),
    ("p", "P"),
    ("open-bracket", "["),
    ("close-bracket", "]"),
    ("backslash", "\\"),
    ("caps", "Caps Lock"),
    ("a", "A"),
    ("s", "S"),
    ("d", "D"),
    ("f", "F"),
    ("g", "G"),
    ("h", "H"),
    ("j", "J"),
    ("k", "K"),
    ("l", "L"),
    ("semicolon", ";"),
    ("apostrophe", "'"),
    ("enter", "Enter"),
    ("shift-left", "Shift"),
    ("z", "Z"),
    ("x", "X"),
    ("c", "C"),
    ("v", "V"),
    ("b", "B"),
    ("n", "N"),
    ("m", "M"),
    ("comma", ","),
    ("period", "."),
    ("slash", "/"),
    ("shift-right", "Shift"),
    ("ctrl-left", "Ctrl"),
    ("win", "Win"),
    ("alt-left", "Alt"),
    ("space", "Space"),
    ("alt-right", "Alt"),
    ("fn", "Fn"),
    ("menu", "Menu"),
    ("ctrl-right", "Ctrl"),
];

/// Navigation cluster.
pub const NAVIGATION_INPUTS: &[(&str, &str)] = &[
    ("insert", "Insert"),
    ("home", "Home"),
    ("page-up", "Page Up"),
    ("delete", "Delete"),
    ("end", "End"),
    ("page-down", "Page Down"),
    ("arrow-up", "Up"),
    ("arrow-left", "Left"),
    ("arrow-down", "Down"),
    ("arrow-right", "Right"),
];

/// Numeric keypad, prefixed so it never collides with the top-row digits.
pub const KEYPAD_INPUTS: &[(&str, &str)] = &[
    ("numpad-0", "Num 0"),
    ("numpad-1", "Num 1"),
    ("numpad-2", "Num 2"),
    ("numpad-3", "Num 3"),
    ("numpad-4", "Num 4"),
    ("numpad-5", "Num 5"),
    ("numpad-6", "Num 6"),
    ("numpad-7", "Num 7"),
    ("numpad-8", "Num 8"),
    ("numpad-9", "Num 9"),
    ("numpad-add", "Num +"),
    ("numpad-subtract", "Num -"),
    ("numpad-multiply", "Num *"),
    ("numpad-divide", "Num /"),
    ("numpad-decimal", "Num ."),
    ("numpad-enter", "Num Enter"),
];

/// Mouse buttons and wheel.
pub const MOUSE_INPUTS: &[(&str, &str)] = &[
    ("mouse-left", "Left Click"),
    ("mouse-right", "Right Click"),
    ("mouse-middle", "Middle Click"),
    ("mouse-scroll-up", "Scroll Up"),
    ("mouse-scroll-down", "Scroll Down"),
];

fn fixed_inputs() -> impl Iterator<Item = &'static (&'static str, &'static str)> {
    KEYBOARD_INPUTS
        .iter()
        .chain(NAVIGATION_INPUTS)
        .chain(KEYPAD_INPUTS)
        .chain(MOUSE_INPUTS)
}

// ============================================================================
// InputId
// ============================================================================

/// Canonical identifier of one bindable input. Always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(String);

impl InputId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_lowercase())
    }

    /// `extra-N` for `1 <= n <= 16`.
    pub fn extra(n: u8) -> Option<Self> {
        (1..=EXTRA_BUTTON_COUNT)
            .contains(&n)
            .then(|| Self(format!("extra-{n}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Button number of an extra button.
    pub fn extra_index(&self) -> Option<u8> {
        let n: u8 = self.0.strip_prefix("extra-")?.parse().ok()?;
        (1..=EXTRA_BUTTON_COUNT).contains(&n).then_some(n)
    }

    pub fn is_extra(&self) -> bool {
        self.extra_index().is_some()
    }

    pub fn is_mouse(&self) -> bool {
        self.0.starts_with("mouse-")
    }

    /// True when the id belongs to the layout vocabulary.
    pub fn is_known(&self) -> bool {
        self.is_extra() || fixed_inputs().any(|(id, _)| *id == self.0)
    }

    /// Caption shown on the layout when no custom label applies.
    pub fn default_label(&self) -> String {
        if let Some(n) = self.extra_index() {
            return format!("Extra {n}");
        }
        fixed_inputs()
            .find(|(id, _)| *id == self.0)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| self.0.to_uppercase())
    }

    /// Every input of the layout, keyboard first, extra buttons last.
    pub fn all() -> Vec<InputId> {
        fixed_inputs()
            .map(|(id, _)| InputId::new(id))
            .chain((1..=EXTRA_BUTTON_COUNT).filter_map(InputId::extra))
            .collect()
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ============================================================================
// BindingKey
// ============================================================================

/// An input combined with a modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub input: InputId,
    pub modifiers: ModifierSet,
}

impl BindingKey {
    pub fn new(input: impl Into<InputId>, modifiers: ModifierSet) -> Self {
        Self {
            input: input.into(),
            modifiers,
        }
    }

    /// The same input with no modifiers.
    pub fn unmodified(input: impl Into<InputId>) -> Self {
        Self::new(input, ModifierSet::NONE)
    }

    pub fn base(&self) -> BindingKey {
        BindingKey::unmodified(self.input.clone())
    }

    pub fn label(&self) -> ModifierLabel {
        self.modifiers.label()
    }

    /// Human-readable form, e.g. `"Ctrl + Shift + F"`.
    pub fn describe(&self) -> String {
        format!(
            "{}{}",
            self.modifiers.display_prefix(),
            self.input.default_label()
        )
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.input, self.modifiers.suffix())
    }
}

impl FromStr for BindingKey {
    type Err = ParseError;

    /// Parse the composite string form (`"fCtrlShift"`).
    ///
    /// Input ids are lower-case, so the longest capitalized canonical suffix
    /// that leaves a non-empty input is the modifier part.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::new("Empty binding key"));
        }

        let mut candidates: Vec<ModifierSet> = ModifierSet::ALL
            .into_iter()
            .filter(|set| !set.is_empty())
            .collect();
        candidates.sort_by_key(|set| std::cmp::Reverse(set.suffix().len()));

        let (input, modifiers) = candidates
            .into_iter()
            .find_map(|set| {
                let input = s.strip_suffix(set.suffix().as_str())?;
                (!input.is_empty()).then_some((input, set))
            })
            .unwrap_or((s, ModifierSet::NONE));

        if input.chars().any(|c| c.is_uppercase()) {
            return Err(ParseError::new(format!(
                "Invalid modifier suffix in binding key '{}'",
                s
            )));
        }

        Ok(BindingKey::new(input, modifiers))
    }
}
