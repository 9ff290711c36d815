//! Keybinding system for the spellbind keybind editor.
//!
//! This crate resolves raw keyboard and mouse input to stable input ids,
//! tracks the active modifiers, and holds the map from modified input to
//! bound spell.
//!
//! Features:
//! - Stable input vocabulary (keyboard, navigation, keypad, mouse, extra buttons)
//! - Physical key codes preferred over layout-dependent key names
//! - Eight modifier combinations with a canonical Ctrl, Alt, Shift order
//! - Display fallback from a modified binding to the unmodified one
//! - Human-readable binding strings ("Ctrl+Shift+F")

pub mod display;
pub mod input;
mod keybind_map;
mod modifier_state;
pub mod parser;
pub mod resolver;

pub use display::{KeyDisplay, input_caption, resolve_display};
pub use input::{BindingKey, EXTRA_BUTTON_COUNT, InputId};
pub use keybind_map::KeybindMap;
pub use modifier_state::ModifierState;
pub use parser::{ParseError, parse_assignment, parse_binding};
pub use resolver::{MouseButton, RawInput, composite, modifier_for_key, resolve, resolve_binding};
