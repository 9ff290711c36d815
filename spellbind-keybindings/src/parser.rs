//! Binding string parser.
//!
//! Parses human-readable strings like "Ctrl+Shift+F" into [`BindingKey`]s and
//! assignments like "Ctrl+F=Frostbolt" into a key plus spell name.

use spellbind_config::{Modifier, ModifierSet};
use std::fmt;

use crate::input::{BindingKey, InputId};
use crate::resolver::input_for_key_name;

/// Error type for binding parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Parse a binding combination into a [`BindingKey`].
///
/// Supported format: "Modifier+Modifier+Input"
///
/// Modifiers (any order, case-insensitive):
/// - `Ctrl`, `Control`
/// - `Alt`, `Option`
/// - `Shift`
///
/// Inputs:
/// - Layout ids: `f`, `numpad-3`, `mouse-left`, `extra-2`, ...
/// - Key names: `F1`, `Space`, `Escape`, `PageUp`, `ArrowLeft`, ...
pub fn parse_binding(s: &str) -> Result<BindingKey, ParseError> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();

    let mut modifiers = ModifierSet::NONE;
    let mut input_part = None;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;

        if let Ok(modifier) = part.parse::<Modifier>() {
            if is_last {
                return Err(ParseError(
                    "Binding ends with modifier, no input specified".to_string(),
                ));
            }
            modifiers.insert(modifier);
            continue;
        }

        if input_part.is_some() {
            return Err(ParseError(format!(
                "Multiple inputs specified: already have input, found '{}'",
                part
            )));
        }
        input_part = Some(*part);
    }

    let input_str = match input_part {
        Some(input) if !input.is_empty() => input,
        _ => return Err(ParseError("No input specified".to_string())),
    };
    let input = parse_input(input_str)?;

    Ok(BindingKey::new(input, modifiers))
}

/// Parse an assignment like `"Ctrl+F=Frostbolt"` into a key and a spell name.
pub fn parse_assignment(s: &str) -> Result<(BindingKey, String), ParseError> {
    let (binding, spell) = s
        .split_once('=')
        .ok_or_else(|| ParseError(format!("Expected 'BINDING=SPELL', got '{}'", s)))?;

    let spell = spell.trim();
    if spell.is_empty() {
        return Err(ParseError(format!("No spell name in '{}'", s)));
    }

    Ok((parse_binding(binding)?, spell.to_string()))
}

fn parse_input(s: &str) -> Result<InputId, ParseError> {
    let id = InputId::new(s);
    if id.is_known() {
        return Ok(id);
    }

    input_for_key_name(s).ok_or_else(|| ParseError(format!("Unknown input: '{}'", s)))
}
