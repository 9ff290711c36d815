// Library exports for testing and potential library use
//
// The data layer (catalog, configurations, profiles, settings) lives in
// `spellbind-config`; input resolution and the keybind map live in
// `spellbind-keybindings`. This crate ties them into an editing session and
// the command-line front end.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod session;

pub use session::{
    LoadPhase, ObserverId, Session, SessionError, SessionEvent, SettleMode,
    UNSAVED_CONFIGURATION_NAME,
};
pub use spellbind_config as config;
pub use spellbind_keybindings as keybindings;
