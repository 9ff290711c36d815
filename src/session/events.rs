//! Change notifications sent to the view layer.

use spellbind_config::{ModifierSet, Spell};
use spellbind_keybindings::{BindingKey, InputId};

use super::loader::LoadPhase;

/// Something the view must re-render for.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// One binding was added, replaced or removed.
    BindingChanged {
        key: BindingKey,
        /// Spell now bound, `None` after an unbind
        spell: Option<Spell>,
        /// Spell the key held before, now back in the available pool
        previous: Option<Spell>,
    },
    /// Every binding was removed at once.
    BindingsCleared,
    /// The active modifier combination changed (or was cleared).
    ModifiersChanged(ModifierSet),
    /// Expansion and/or class changed; the spell list must be rebuilt.
    SelectionChanged { expansion: String, class_name: String },
    /// A profile was activated, deactivated or re-applied; all bindings and
    /// labels were replaced.
    ProfileSwitched { profile: Option<String> },
    /// An extra button's caption changed; `None` restores the default.
    CustomLabelChanged { input: InputId, label: Option<String> },
    /// A configuration load reached a new phase.
    LoadProgress(LoadPhase),
}

/// Handle returned by [`super::Session::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

pub(crate) type Observer = Box<dyn FnMut(&SessionEvent)>;
