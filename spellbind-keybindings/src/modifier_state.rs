//! Active modifier tracking.
//!
//! Modifiers can be latched with on-screen buttons ([`ModifierState::toggle`])
//! or held on the keyboard ([`ModifierState::press`] / [`ModifierState::release`]).

use spellbind_config::{Modifier, ModifierLabel, ModifierSet, UnknownModifier};

/// Which of Ctrl, Alt and Shift are currently active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    active: ModifierSet,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one modifier. Returns the new state of that modifier.
    pub fn toggle(&mut self, modifier: Modifier) -> bool {
        let now_active = !self.active.contains(modifier);
        self.active.set(modifier, now_active);
        log::debug!("Modifier {} toggled -> {}", modifier, now_active);
        now_active
    }

    /// Toggle by name (`"shift"`, `"ctrl"`, `"alt"`), validating the name.
    pub fn toggle_named(&mut self, name: &str) -> Result<bool, UnknownModifier> {
        let modifier: Modifier = name.parse()?;
        Ok(self.toggle(modifier))
    }

    /// Activate a held modifier. Returns whether anything changed.
    pub fn press(&mut self, modifier: Modifier) -> bool {
        if self.active.contains(modifier) {
            return false;
        }
        self.toggle(modifier);
        true
    }

    /// Deactivate a released modifier. Returns whether anything changed.
    pub fn release(&mut self, modifier: Modifier) -> bool {
        if !self.active.contains(modifier) {
            return false;
        }
        self.toggle(modifier);
        true
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.active.contains(modifier)
    }

    pub fn has_any(&self) -> bool {
        !self.active.is_empty()
    }

    /// Deactivate everything.
    pub fn clear(&mut self) {
        self.active = ModifierSet::NONE;
    }

    /// Human-readable prefix, e.g. `"Ctrl + Shift + "`.
    pub fn active_label(&self) -> String {
        self.active.display_prefix()
    }

    /// Binding-key suffix, e.g. `"CtrlShift"`.
    pub fn active_suffix(&self) -> String {
        self.active.suffix()
    }

    pub fn active_set(&self) -> ModifierSet {
        self.active
    }

    pub fn storage_label(&self) -> ModifierLabel {
        self.active.label()
    }

    pub fn set_active(&mut self, modifiers: ModifierSet) {
        self.active = modifiers;
    }
}
