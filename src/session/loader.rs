//! Configuration load sequencing.
//!
//! Applying a configuration happens in three phases: switch expansion, switch
//! class, apply keybinds. The view rebuilds its spell list after each
//! selection change, so keybinds must not be applied before that rebuild has
//! finished. Each phase advances on a completion signal rather than a timer.

use spellbind_config::Configuration;
use std::fmt;

/// Phase of an in-flight configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    SwitchExpansion,
    SwitchClass,
    ApplyKeybinds,
    Complete,
}

impl LoadPhase {
    pub fn next(self) -> LoadPhase {
        match self {
            LoadPhase::SwitchExpansion => LoadPhase::SwitchClass,
            LoadPhase::SwitchClass => LoadPhase::ApplyKeybinds,
            LoadPhase::ApplyKeybinds | LoadPhase::Complete => LoadPhase::Complete,
        }
    }

    /// Phases after which the view must settle before the load may continue.
    pub fn needs_settle(self) -> bool {
        matches!(self, LoadPhase::SwitchExpansion | LoadPhase::SwitchClass)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::SwitchExpansion => "switch expansion",
            LoadPhase::SwitchClass => "switch class",
            LoadPhase::ApplyKeybinds => "apply keybinds",
            LoadPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// How a load waits between phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettleMode {
    /// Selection changes take effect synchronously; run all phases at once.
    #[default]
    Immediate,
    /// Wait for [`super::Session::acknowledge_settled`] after each selection change.
    Acknowledged,
}

/// A configuration being applied.
#[derive(Debug, Clone)]
pub(crate) struct LoadSequence {
    pub configuration: Configuration,
    pub phase: LoadPhase,
}

impl LoadSequence {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            phase: LoadPhase::SwitchExpansion,
        }
    }
}
