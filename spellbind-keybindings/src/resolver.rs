//! Key identity resolution.
//!
//! Maps raw input events (DOM-style keyboard `key`/`code` pairs, mouse
//! buttons, wheel movement, auxiliary buttons) to the [`InputId`] vocabulary,
//! and composes an input with the active modifiers into a [`BindingKey`].
//!
//! Everything here is pure: the same event always resolves to the same id.

use spellbind_config::Modifier;

use crate::input::{BindingKey, InputId};
use crate::modifier_state::ModifierState;

/// Mouse buttons, numbered as in DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Any further button (4th, 5th, ...), numbered from 1.
    Other(u8),
}

impl MouseButton {
    pub fn from_dom_button(button: u16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            n => MouseButton::Other(u8::try_from(n - 2).unwrap_or(u8::MAX)),
        }
    }
}

/// A raw input event as delivered by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// Keyboard event: logical `key` plus optional physical `code`.
    Key { key: String, code: Option<String> },
    /// Mouse button press.
    Mouse(MouseButton),
    /// Wheel movement; negative `delta_y` scrolls up.
    Wheel { delta_y: f64 },
    /// Auxiliary button `n` of a gaming mouse or keypad.
    Extra(u8),
}

impl RawInput {
    pub fn key(key: impl Into<String>) -> Self {
        RawInput::Key {
            key: key.into(),
            code: None,
        }
    }

    pub fn key_with_code(key: impl Into<String>, code: impl Into<String>) -> Self {
        RawInput::Key {
            key: key.into(),
            code: Some(code.into()),
        }
    }
}

/// Resolve a raw event to its input id.
///
/// For keyboard events the physical `code` wins when it is known, so the
/// same key position resolves identically on every layout. Returns `None`
/// for inputs outside the vocabulary and for a wheel event without movement.
pub fn resolve(event: &RawInput) -> Option<InputId> {
    match event {
        RawInput::Key { key, code } => code
            .as_deref()
            .and_then(input_for_code)
            .or_else(|| input_for_key_name(key)),
        RawInput::Mouse(MouseButton::Left) => Some(InputId::new("mouse-left")),
        RawInput::Mouse(MouseButton::Middle) => Some(InputId::new("mouse-middle")),
        RawInput::Mouse(MouseButton::Right) => Some(InputId::new("mouse-right")),
        RawInput::Mouse(MouseButton::Other(n)) => InputId::extra(*n),
        RawInput::Wheel { delta_y } if *delta_y < 0.0 => Some(InputId::new("mouse-scroll-up")),
        RawInput::Wheel { delta_y } if *delta_y > 0.0 => Some(InputId::new("mouse-scroll-down")),
        RawInput::Wheel { .. } => None,
        RawInput::Extra(n) => InputId::extra(*n),
    }
}

/// Compose an input with the currently active modifiers.
pub fn composite(input: &InputId, modifiers: &ModifierState) -> BindingKey {
    BindingKey::new(input.clone(), modifiers.active_set())
}

/// Resolve and compose in one step.
pub fn resolve_binding(event: &RawInput, modifiers: &ModifierState) -> Option<BindingKey> {
    resolve(event).map(|input| composite(&input, modifiers))
}

/// The modifier a keyboard event toggles, if it is a modifier key.
pub fn modifier_for_key(event: &RawInput) -> Option<Modifier> {
    let RawInput::Key { key, code } = event else {
        return None;
    };
    match key.as_str() {
        "Shift" => return Some(Modifier::Shift),
        "Control" => return Some(Modifier::Ctrl),
        "Alt" | "AltGraph" => return Some(Modifier::Alt),
        _ => {}
    }
    match code.as_deref()? {
        "ShiftLeft" | "ShiftRight" => Some(Modifier::Shift),
        "ControlLeft" | "ControlRight" => Some(Modifier::Ctrl),
        "AltLeft" | "AltRight" => Some(Modifier::Alt),
        _ => None,
    }
}

/// Map a physical key code (`KeyA`, `Digit1`, `Numpad1`, ...) to an input id.
pub fn input_for_code(code: &str) -> Option<InputId> {
    if let Some(letter) = code.strip_prefix("Key")
        && is_single_ascii(letter, |c| c.is_ascii_alphabetic())
    {
        return Some(InputId::new(letter));
    }
    if let Some(digit) = code.strip_prefix("Digit")
        && is_single_ascii(digit, |c| c.is_ascii_digit())
    {
        return Some(InputId::new(digit));
    }
    if let Some(digit) = code.strip_prefix("Numpad")
        && is_single_ascii(digit, |c| c.is_ascii_digit())
    {
        return Some(InputId::new(format!("numpad-{digit}")));
    }
    if let Some(n) = function_key_number(code) {
        return Some(InputId::new(format!("f{n}")));
    }

    let id = match code {
        "Escape" => "esc",
        "Backquote" => "tilde",
        "Minus" => "minus",
        "Equal" => "equals",
        "Backspace" => "backspace",
        "Tab" => "tab",
        "BracketLeft" => "open-bracket",
        "BracketRight" => "close-bracket",
        "Backslash" => "backslash",
        "CapsLock" => "caps",
        "Semicolon" => "semicolon",
        "Quote" => "apostrophe",
        "Enter" => "enter",
        "ShiftLeft" => "shift-left",
        "ShiftRight" => "shift-right",
        "Comma" => "comma",
        "Period" => "period",
        "Slash" => "slash",
        "ControlLeft" => "ctrl-left",
        "ControlRight" => "ctrl-right",
        "MetaLeft" | "MetaRight" | "OSLeft" | "OSRight" => "win",
        "AltLeft" => "alt-left",
        "AltRight" => "alt-right",
        "Space" => "space",
        "Fn" => "fn",
        "ContextMenu" => "menu",
        "ArrowUp" => "arrow-up",
        "ArrowDown" => "arrow-down",
        "ArrowLeft" => "arrow-left",
        "ArrowRight" => "arrow-right",
        "Insert" => "insert",
        "Delete" => "delete",
        "Home" => "home",
        "End" => "end",
        "PageUp" => "page-up",
        "PageDown" => "page-down",
        "NumpadAdd" => "numpad-add",
        "NumpadSubtract" => "numpad-subtract",
        "NumpadMultiply" => "numpad-multiply",
        "NumpadDivide" => "numpad-divide",
        "NumpadDecimal" => "numpad-decimal",
        "NumpadEnter" => "numpad-enter",
        _ => return None,
    };
    Some(InputId::new(id))
}

/// Map a logical key name (DOM `KeyboardEvent.key`) to an input id.
///
/// Letters and digits map verbatim (lower-cased); shifted US-layout symbols map
/// to the key that produces them. Named keys are matched case-insensitively.
pub fn input_for_key_name(key: &str) -> Option<InputId> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return input_for_char(c);
    }

    if let Some(n) = function_key_number(&key.to_ascii_uppercase()) {
        return Some(InputId::new(format!("f{n}")));
    }

    let id = match key.to_ascii_lowercase().as_str() {
        "escape" | "esc" => "esc",
        "backspace" => "backspace",
        "tab" => "tab",
        "capslock" | "caps" => "caps",
        "enter" | "return" => "enter",
        "shift" => "shift-left",
        "control" | "ctrl" => "ctrl-left",
        "alt" => "alt-left",
        "altgraph" => "alt-right",
        "meta" | "os" | "super" | "win" => "win",
        "fn" => "fn",
        "contextmenu" | "menu" => "menu",
        "space" | "spacebar" => "space",
        "arrowup" | "up" => "arrow-up",
        "arrowdown" | "down" => "arrow-down",
        "arrowleft" | "left" => "arrow-left",
        "arrowright" | "right" => "arrow-right",
        "insert" => "insert",
        "delete" | "del" => "delete",
        "home" => "home",
        "end" => "end",
        "pageup" => "page-up",
        "pagedown" => "page-down",
        _ => return None,
    };
    Some(InputId::new(id))
}

fn input_for_char(c: char) -> Option<InputId> {
    if c.is_ascii_alphanumeric() {
        return Some(InputId::new(c.to_string()));
    }
    let id = match c {
        ' ' => "space",
        '`' | '~' => "tilde",
        '-' | '_' => "minus",
        '=' | '+' => "equals",
        '[' | '{' => "open-bracket",
        ']' | '}' => "close-bracket",
        '\\' | '|' => "backslash",
        ';' | ':' => "semicolon",
        '\'' | '"' => "apostrophe",
        ',' | '<' => "comma",
        '.' | '>' => "period",
        '/' | '?' => "slash",
        '!' => "1",
        '@' => "2",
        '#' => "3",
        '$' => "4",
        '%' => "5",
        '^' => "6",
        '&' => "7",
        '*' => "8",
        '(' => "9",
        ')' => "0",
        _ => return None,
    };
    Some(InputId::new(id))
}

/// `F1`..`F12` -> 1..12
fn function_key_number(name: &str) -> Option<u8> {
    let n: u8 = name.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&n).then_some(n)
}

fn is_single_ascii(s: &str, pred: impl Fn(char) -> bool) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if pred(c))
}
