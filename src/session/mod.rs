//! The editing session.
//!
//! A [`Session`] owns everything the user edits: the (expansion, class)
//! selection, the keybind map, the modifier state and the extra-button
//! labels. It is the only place these change, and every change is announced
//! synchronously to the registered observers so the view can re-render.
//!
//! Persistence goes through the configuration and profile stores the session
//! was built with. Loading a configuration is sequenced by [`loader`].

mod error;
pub mod events;
pub mod loader;

pub use error::SessionError;
pub use events::{ObserverId, SessionEvent};
pub use loader::{LoadPhase, SettleMode};

use spellbind_config::{
    Configuration, ConfigurationStore, CustomLabels, ExportedConfiguration, Modifier, Profile,
    ProfileEntry, ProfileStore, Spell, SpellCatalog, StoreError, StoredKeybinds,
    encode_share_string,
};
use spellbind_keybindings::{
    BindingKey, InputId, KeyDisplay, KeybindMap, ModifierState, RawInput, composite,
    input_caption, modifier_for_key, resolve_binding, resolve_display,
};

use events::Observer;
use loader::LoadSequence;

/// Name used for the share string of a session that was never saved.
pub const UNSAVED_CONFIGURATION_NAME: &str = "Shared configuration";

/// One user's editing session.
pub struct Session {
    catalog: SpellCatalog,
    configurations: ConfigurationStore,
    profiles: ProfileStore,

    expansion: String,
    class_name: String,

    keybinds: KeybindMap,
    modifiers: ModifierState,
    custom_labels: CustomLabels,

    /// Active profile; its branch for the selection is applied on every selection change
    active_profile: Option<Profile>,

    settle_mode: SettleMode,
    load: Option<LoadSequence>,

    observers: Vec<(ObserverId, Observer)>,
    next_observer_id: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("expansion", &self.expansion)
            .field("class_name", &self.class_name)
            .field("bindings", &self.keybinds.len())
            .field("modifiers", &self.modifiers)
            .field("active_profile", &self.active_profile())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    /// Create a session selecting the catalog's first expansion and class.
    pub fn new(
        catalog: SpellCatalog,
        configurations: ConfigurationStore,
        profiles: ProfileStore,
    ) -> Self {
        let expansion = catalog.default_expansion().unwrap_or_default().to_string();
        let class_name = catalog.default_class(&expansion).unwrap_or_default().to_string();
        log::info!(
            "Session started ({} expansions, selection {}/{})",
            catalog.expansions().len(),
            expansion,
            class_name
        );

        Self {
            catalog,
            configurations,
            profiles,
            expansion,
            class_name,
            keybinds: KeybindMap::new(),
            modifiers: ModifierState::new(),
            custom_labels: CustomLabels::new(),
            active_profile: None,
            settle_mode: SettleMode::default(),
            load: None,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// Session whose stores never touch the filesystem.
    pub fn in_memory(catalog: SpellCatalog) -> Self {
        Self::new(
            catalog,
            ConfigurationStore::in_memory(),
            ProfileStore::in_memory(),
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn catalog(&self) -> &SpellCatalog {
        &self.catalog
    }

    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn keybinds(&self) -> &KeybindMap {
        &self.keybinds
    }

    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    pub fn custom_labels(&self) -> &CustomLabels {
        &self.custom_labels
    }

    pub fn active_profile(&self) -> Option<&str> {
        self.active_profile.as_ref().map(|p| p.name.as_str())
    }

    /// Name of the configuration last saved or loaded.
    pub fn current_configuration(&self) -> Option<&str> {
        self.configurations.current()
    }

    pub fn is_storage_degraded(&self) -> bool {
        self.configurations.is_degraded() || self.profiles.is_degraded()
    }

    pub fn settle_mode(&self) -> SettleMode {
        self.settle_mode
    }

    pub fn set_settle_mode(&mut self, mode: SettleMode) {
        self.settle_mode = mode;
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a change observer. Observers are called synchronously, in
    /// registration order, after each mutation.
    pub fn subscribe(&mut self, observer: Box<dyn FnMut(&SessionEvent)>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn emit(&mut self, event: SessionEvent) {
        log::trace!("Session event: {:?}", event);
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select an expansion; its first class is selected with it.
    pub fn select_expansion(&mut self, expansion: &str) -> Result<(), SessionError> {
        if !self.catalog.has_expansion(expansion) {
            return Err(SessionError::UnknownExpansion(expansion.to_string()));
        }
        if expansion == self.expansion {
            return Ok(());
        }
        self.set_selection(expansion.to_string(), None);
        Ok(())
    }

    /// Select a class of the current expansion.
    pub fn select_class(&mut self, class_name: &str) -> Result<(), SessionError> {
        self.check_class(&self.expansion, class_name)?;
        if class_name == self.class_name {
            return Ok(());
        }
        self.set_selection(self.expansion.clone(), Some(class_name.to_string()));
        Ok(())
    }

    /// Select expansion and class together, with a single selection change.
    pub fn select(&mut self, expansion: &str, class_name: &str) -> Result<(), SessionError> {
        self.check_class(expansion, class_name)?;
        if expansion == self.expansion && class_name == self.class_name {
            return Ok(());
        }
        self.set_selection(expansion.to_string(), Some(class_name.to_string()));
        Ok(())
    }

    fn check_class(&self, expansion: &str, class_name: &str) -> Result<(), SessionError> {
        if !self.catalog.has_expansion(expansion) {
            return Err(SessionError::UnknownExpansion(expansion.to_string()));
        }
        if !self.catalog.has_class(expansion, class_name) {
            return Err(SessionError::UnknownClass {
                expansion: expansion.to_string(),
                class_name: class_name.to_string(),
            });
        }
        Ok(())
    }

    fn set_selection(&mut self, expansion: String, class_name: Option<String>) {
        let class_name = class_name
            .or_else(|| self.catalog.default_class(&expansion).map(str::to_string))
            .unwrap_or_default();
        log::info!("Selection changed to {}/{}", expansion, class_name);

        self.expansion = expansion;
        self.class_name = class_name;
        self.emit(SessionEvent::SelectionChanged {
            expansion: self.expansion.clone(),
            class_name: self.class_name.clone(),
        });
        self.apply_selection();
    }

    /// Bring bindings in line with the selection: the active profile's branch
    /// if a profile is active (empty when it has none), else nothing.
    fn apply_selection(&mut self) {
        let profile_branch = self.active_profile.as_ref().map(|profile| {
            let entry = profile
                .entry(&self.expansion, &self.class_name)
                .cloned()
                .unwrap_or_default();
            (profile.name.clone(), entry)
        });

        match profile_branch {
            Some((name, entry)) => {
                log::debug!(
                    "Applying profile '{}' branch {}/{} ({} inputs)",
                    name,
                    self.expansion,
                    self.class_name,
                    entry.keybinds.len()
                );
                self.keybinds
                    .replace_all(KeybindMap::from_snapshot(&entry.keybinds));
                self.custom_labels = entry.custom_labels;
                self.emit(SessionEvent::ProfileSwitched { profile: Some(name) });
            }
            None => {
                self.keybinds.clear_all();
                self.emit(SessionEvent::BindingsCleared);
            }
        }
    }

    // ========================================================================
    // Spells
    // ========================================================================

    /// Catalog spells for the selection that are not bound to any key.
    pub fn available_spells(&self) -> Vec<&Spell> {
        self.catalog
            .available_spells(&self.expansion, &self.class_name)
            .into_iter()
            .filter(|spell| !self.keybinds.is_bound(spell))
            .collect()
    }

    /// Available spells whose name contains `term` (case-insensitive).
    pub fn search_spells(&self, term: &str) -> Vec<&Spell> {
        let needle = term.to_lowercase();
        self.available_spells()
            .into_iter()
            .filter(|spell| spell.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Catalog spell for the selection with this exact name (case-insensitive).
    pub fn find_spell(&self, name: &str) -> Option<&Spell> {
        let needle = name.to_lowercase();
        self.catalog
            .available_spells(&self.expansion, &self.class_name)
            .into_iter()
            .find(|spell| spell.name.to_lowercase() == needle)
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Bind a spell to `input` under the active modifiers.
    ///
    /// Returns the spell the key held before, which is available again.
    pub fn bind(&mut self, input: &InputId, spell: Spell) -> Option<Spell> {
        let key = composite(input, &self.modifiers);
        self.bind_key(key, spell)
    }

    /// Bind a spell to an explicit binding key.
    pub fn bind_key(&mut self, key: BindingKey, spell: Spell) -> Option<Spell> {
        let previous = self.keybinds.bind(key.clone(), spell.clone());
        self.emit(SessionEvent::BindingChanged {
            key,
            spell: Some(spell),
            previous: previous.clone(),
        });
        previous
    }

    /// Bind a catalog spell by name.
    pub fn bind_spell_named(
        &mut self,
        key: BindingKey,
        name: &str,
    ) -> Result<Option<Spell>, SessionError> {
        let spell = self
            .find_spell(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSpell(name.to_string()))?;
        Ok(self.bind_key(key, spell))
    }

    /// Unbind `input` under the active modifiers.
    pub fn unbind(&mut self, input: &InputId) -> Option<Spell> {
        let key = composite(input, &self.modifiers);
        self.unbind_key(&key)
    }

    /// Unbind an explicit key. Unbinding an unbound key changes nothing.
    pub fn unbind_key(&mut self, key: &BindingKey) -> Option<Spell> {
        let removed = self.keybinds.unbind(key)?;
        self.emit(SessionEvent::BindingChanged {
            key: key.clone(),
            spell: None,
            previous: Some(removed.clone()),
        });
        Some(removed)
    }

    /// Remove every binding at once.
    pub fn clear_all(&mut self) {
        self.keybinds.clear_all();
        self.emit(SessionEvent::BindingsCleared);
    }

    /// Exact lookup, no display fallback.
    pub fn lookup(&self, key: &BindingKey) -> Option<&Spell> {
        self.keybinds.lookup(key)
    }

    /// What `input` shows for the active modifiers.
    pub fn key_state(&self, input: &InputId) -> KeyDisplay<'_> {
        resolve_display(&self.keybinds, input, self.modifiers.active_set())
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    pub fn toggle_modifier(&mut self, modifier: Modifier) -> bool {
        let active = self.modifiers.toggle(modifier);
        self.emit_modifiers();
        active
    }

    pub fn press_modifier(&mut self, modifier: Modifier) {
        if self.modifiers.press(modifier) {
            self.emit_modifiers();
        }
    }

    pub fn release_modifier(&mut self, modifier: Modifier) {
        if self.modifiers.release(modifier) {
            self.emit_modifiers();
        }
    }

    /// Deactivate all modifiers. Always notifies, even if none were active.
    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
        self.emit_modifiers();
    }

    fn emit_modifiers(&mut self) {
        let active = self.modifiers.active_set();
        self.emit(SessionEvent::ModifiersChanged(active));
    }

    /// Feed a key-down. Modifier keys activate their modifier and return
    /// `None`; any other input resolves to the binding key it addresses.
    pub fn key_down(&mut self, event: &RawInput) -> Option<BindingKey> {
        if let Some(modifier) = modifier_for_key(event) {
            self.press_modifier(modifier);
            return None;
        }
        resolve_binding(event, &self.modifiers)
    }

    /// Feed a key-up. Releases a held modifier.
    pub fn key_up(&mut self, event: &RawInput) {
        if let Some(modifier) = modifier_for_key(event) {
            self.release_modifier(modifier);
        }
    }

    // ========================================================================
    // Custom labels
    // ========================================================================

    /// Set an extra button's caption. An empty (or blank) label restores the default.
    pub fn set_custom_label(&mut self, input: &InputId, label: &str) -> Result<(), SessionError> {
        if !input.is_extra() {
            return Err(SessionError::NotAnExtraButton(input.to_string()));
        }
        let label = label.trim();
        let stored = if label.is_empty() {
            self.custom_labels.remove(input.as_str());
            None
        } else {
            self.custom_labels
                .insert(input.as_str().to_string(), label.to_string());
            Some(label.to_string())
        };
        self.emit(SessionEvent::CustomLabelChanged {
            input: input.clone(),
            label: stored,
        });
        Ok(())
    }

    pub fn input_caption(&self, input: &InputId) -> String {
        input_caption(input, &self.custom_labels)
    }

    // ========================================================================
    // Configurations
    // ========================================================================

    fn keybind_snapshot(&self) -> StoredKeybinds {
        self.keybinds.to_snapshot_with(|spell| {
            self.catalog
                .spell_id(&self.expansion, &self.class_name, spell)
        })
    }

    /// Snapshot of the session as a configuration, timestamped now.
    pub fn snapshot(&self, name: &str, description: &str) -> Configuration {
        Configuration::builder(name)
            .description(description)
            .expansion(self.expansion.as_str())
            .class_name(self.class_name.as_str())
            .keybinds(self.keybind_snapshot())
            .custom_labels(self.custom_labels.clone())
            .build()
    }

    /// Save the session under `name`, overwriting any configuration of that name.
    pub fn save_configuration(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<Configuration, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let configuration = self.snapshot(name, description);
        self.configurations.save(configuration.clone())?;
        Ok(configuration)
    }

    /// Fetch a saved configuration and start applying it.
    ///
    /// Returns the phase the load stopped at: [`LoadPhase::Complete`] in
    /// immediate mode, otherwise the phase awaiting
    /// [`Session::acknowledge_settled`].
    pub fn load_configuration(&mut self, name: &str) -> Result<LoadPhase, SessionError> {
        let configuration = self.configurations.fetch(name)?;
        let phase = self.begin_load(configuration)?;
        self.configurations.set_current(Some(name));
        Ok(phase)
    }

    /// Apply a configuration in phases. Nothing changes if its expansion or
    /// class is not in the catalog.
    pub fn begin_load(&mut self, configuration: Configuration) -> Result<LoadPhase, SessionError> {
        self.check_class(&configuration.expansion, &configuration.class_name)?;
        log::info!(
            "Loading configuration '{}' ({}/{}, {} bindings)",
            configuration.name,
            configuration.expansion,
            configuration.class_name,
            configuration.binding_count()
        );
        if self.load.is_some() {
            log::warn!("Configuration load started while another was in progress");
        }

        self.clear_all();
        self.load = Some(LoadSequence::new(configuration));
        Ok(self.drive_load())
    }

    /// Signal that the view has settled after the last selection change.
    ///
    /// Returns the phase the load is now waiting at (or `Complete`), or
    /// `None` when no load is in progress.
    pub fn acknowledge_settled(&mut self) -> Option<LoadPhase> {
        let sequence = self.load.as_mut()?;
        sequence.phase = sequence.phase.next();
        Some(self.drive_load())
    }

    /// Phase of the load in progress.
    pub fn load_phase(&self) -> Option<LoadPhase> {
        self.load.as_ref().map(|sequence| sequence.phase)
    }

    fn drive_load(&mut self) -> LoadPhase {
        loop {
            let phase = self.run_load_phase();
            if phase == LoadPhase::Complete {
                return phase;
            }
            if self.settle_mode == SettleMode::Acknowledged && phase.needs_settle() {
                log::debug!("Load waiting for view to settle after {}", phase);
                return phase;
            }
            if let Some(sequence) = self.load.as_mut() {
                sequence.phase = sequence.phase.next();
            }
        }
    }

    fn run_load_phase(&mut self) -> LoadPhase {
        let Some(sequence) = self.load.as_ref() else {
            return LoadPhase::Complete;
        };
        let phase = sequence.phase;

        match phase {
            LoadPhase::SwitchExpansion => {
                let expansion = sequence.configuration.expansion.clone();
                if expansion != self.expansion {
                    self.set_selection(expansion, None);
                }
            }
            LoadPhase::SwitchClass => {
                let class_name = sequence.configuration.class_name.clone();
                if class_name != self.class_name {
                    self.set_selection(self.expansion.clone(), Some(class_name));
                }
            }
            LoadPhase::ApplyKeybinds | LoadPhase::Complete => {
                if let Some(sequence) = self.load.take() {
                    let configuration = sequence.configuration;
                    self.keybinds
                        .replace_all(KeybindMap::from_snapshot(&configuration.keybinds));
                    self.custom_labels = configuration.custom_labels;
                    self.emit(SessionEvent::LoadProgress(LoadPhase::ApplyKeybinds));
                    log::info!("Configuration '{}' applied", configuration.name);
                }
                self.emit(SessionEvent::LoadProgress(LoadPhase::Complete));
                return LoadPhase::Complete;
            }
        }

        self.emit(SessionEvent::LoadProgress(phase));
        phase
    }

    /// Fetch a saved configuration without applying it.
    pub fn find_configuration(&mut self, name: &str) -> Result<Configuration, SessionError> {
        Ok(self.configurations.fetch(name)?)
    }

    /// Remove a saved configuration. Missing names are not an error.
    pub fn delete_configuration(&mut self, name: &str) -> Result<bool, SessionError> {
        Ok(self.configurations.delete(name)?)
    }

    pub fn list_configurations(&mut self) -> Result<Vec<Configuration>, SessionError> {
        Ok(self.configurations.list()?)
    }

    pub fn export_configuration(
        &mut self,
        name: &str,
    ) -> Result<ExportedConfiguration, SessionError> {
        Ok(self.configurations.export(name)?)
    }

    /// Store the configuration carried by an exported file.
    pub fn import_configuration(&mut self, contents: &str) -> Result<Configuration, SessionError> {
        Ok(self.configurations.import(contents)?)
    }

    pub fn share_configuration(&mut self, name: &str) -> Result<String, SessionError> {
        Ok(self.configurations.share_string(name)?)
    }

    /// Store the configuration carried by a share string.
    pub fn import_share_string(&mut self, share: &str) -> Result<Configuration, SessionError> {
        Ok(self.configurations.import_share_string(share)?)
    }

    /// Share string of the live session, without saving it.
    pub fn share_current(&self) -> Result<String, SessionError> {
        let name = self
            .current_configuration()
            .unwrap_or(UNSAVED_CONFIGURATION_NAME)
            .to_string();
        Ok(encode_share_string(&self.snapshot(&name, ""))?)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Merge the current selection's bindings and labels into the named
    /// profile (creating it) and make it the active profile.
    pub fn save_profile(&mut self, name: &str, description: &str) -> Result<Profile, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let entry = ProfileEntry::new(self.keybind_snapshot(), self.custom_labels.clone());
        let result = self.profiles.save(
            name,
            description,
            &self.expansion,
            &self.class_name,
            entry,
        );

        let (profile, error) = match result {
            Ok(profile) => (profile, None),
            // The save took effect in memory; re-read it from there
            Err(StoreError::StorageUnavailable(e)) => match self.profiles.load(name) {
                Ok(profile) => (profile, Some(StoreError::StorageUnavailable(e))),
                Err(_) => return Err(StoreError::StorageUnavailable(e).into()),
            },
            Err(e) => return Err(e.into()),
        };

        let switched = self.active_profile() != Some(name);
        self.active_profile = Some(profile.clone());
        if switched {
            self.emit(SessionEvent::ProfileSwitched {
                profile: Some(profile.name.clone()),
            });
        }

        match error {
            Some(e) => Err(e.into()),
            None => Ok(profile),
        }
    }

    /// Activate a profile and apply its branch for the current selection, or
    /// deactivate with `None` (bindings are left as they are).
    pub fn switch_profile(&mut self, name: Option<&str>) -> Result<(), SessionError> {
        match name {
            Some(name) => {
                let profile = self.profiles.load(name)?;
                log::info!("Switching to profile '{}'", name);
                self.active_profile = Some(profile);
                self.apply_selection();
            }
            None => {
                if self.active_profile.take().is_some() {
                    self.emit(SessionEvent::ProfileSwitched { profile: None });
                }
            }
        }
        Ok(())
    }

    /// Look up a profile without applying it.
    pub fn load_profile(&mut self, name: &str) -> Result<Profile, SessionError> {
        Ok(self.profiles.load(name)?)
    }

    pub fn list_profiles(&mut self) -> Result<Vec<Profile>, SessionError> {
        Ok(self.profiles.list()?)
    }

    /// Remove a profile, deactivating it first if it is active.
    pub fn delete_profile(&mut self, name: &str) -> Result<bool, SessionError> {
        if self.active_profile() == Some(name) {
            self.switch_profile(None)?;
        }
        Ok(self.profiles.delete(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn catalog() -> SpellCatalog {
        let mut catalog = SpellCatalog::new();
        catalog.insert_class(
            "Classic",
            "General",
            vec![Spell::new("Attack", "attack.png")],
        );
        catalog.insert_class(
            "Classic",
            "Mage",
            vec![
                Spell::new("Fireball", "fb.png"),
                Spell::new("Frostbolt", "fr.png"),
            ],
        );
        catalog.insert_class("Classic", "Priest", vec![Spell::new("Smite", "smite.png")]);
        catalog.insert_class("TBC", "Paladin", vec![Spell::new("Seal", "seal.png")]);
        catalog
    }

    fn recorder(session: &mut Session) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(Box::new(move |event| sink.borrow_mut().push(event.clone())));
        events
    }

    #[test]
    fn test_defaults_to_first_expansion_and_class() {
        let session = Session::in_memory(catalog());
        assert_eq!(session.expansion(), "Classic");
        assert_eq!(session.class_name(), "Mage");
    }

    #[test]
    fn test_select_expansion_picks_first_class() {
        let mut session = Session::in_memory(catalog());
        session.select_expansion("TBC").unwrap();
        assert_eq!(session.class_name(), "Paladin");
        assert!(matches!(
            session.select_expansion("Retail"),
            Err(SessionError::UnknownExpansion(_))
        ));
        assert!(matches!(
            session.select_class("General"),
            Err(SessionError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_class_change_clears_without_profile() {
        let mut session = Session::in_memory(catalog());
        session.bind(&InputId::new("f"), Spell::new("Fireball", "fb.png"));
        session.select_class("Priest").unwrap();
        assert!(session.keybinds().is_empty());
    }

    #[test]
    fn test_bound_spell_leaves_available_pool() {
        let mut session = Session::in_memory(catalog());
        assert_eq!(session.available_spells().len(), 3);

        let previous = session.bind(&InputId::new("1"), Spell::new("Fireball", "fb.png"));
        assert!(previous.is_none());
        let names: Vec<_> = session.available_spells().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Attack", "Frostbolt"]);

        session.bind(&InputId::new("1"), Spell::new("Frostbolt", "fr.png"));
        let names: Vec<_> = session.available_spells().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Attack", "Fireball"]);
    }

    #[test]
    fn test_events_fire_synchronously() {
        let mut session = Session::in_memory(catalog());
        let events = recorder(&mut session);

        session.toggle_modifier(Modifier::Ctrl);
        session.bind(&InputId::new("f"), Spell::new("Frostbolt", "fr.png"));
        session.unbind(&InputId::new("q"));
        session.clear_modifiers();
        session.clear_modifiers();

        let events = events.borrow();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], SessionEvent::ModifiersChanged(set) if set.ctrl));
        match &events[1] {
            SessionEvent::BindingChanged { key, spell, previous } => {
                assert_eq!(key.to_string(), "fCtrl");
                assert_eq!(spell.as_ref().unwrap().name, "Frostbolt");
                assert!(previous.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(events[2], SessionEvent::ModifiersChanged(set) if set.is_empty()));
        assert!(matches!(events[3], SessionEvent::ModifiersChanged(set) if set.is_empty()));
    }

    #[test]
    fn test_unsubscribe() {
        let mut session = Session::in_memory(catalog());
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let id = session.subscribe(Box::new(move |_| *sink.borrow_mut() += 1));

        session.clear_all();
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.clear_all();
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_key_down_up_handles_modifiers() {
        let mut session = Session::in_memory(catalog());
        assert!(session.key_down(&RawInput::key("Shift")).is_none());
        let key = session.key_down(&RawInput::key_with_code("q", "KeyQ")).unwrap();
        assert_eq!(key.to_string(), "qShift");
        session.key_up(&RawInput::key("Shift"));
        assert!(!session.modifiers().has_any());
    }

    #[test]
    fn test_custom_labels_only_on_extra_buttons() {
        let mut session = Session::in_memory(catalog());
        let extra = InputId::new("extra-5");
        session.set_custom_label(&extra, "Thumb").unwrap();
        assert_eq!(session.input_caption(&extra), "Thumb");

        session.set_custom_label(&extra, "  ").unwrap();
        assert_eq!(session.input_caption(&extra), "Extra 5");
        assert!(session.custom_labels().is_empty());

        assert!(matches!(
            session.set_custom_label(&InputId::new("q"), "x"),
            Err(SessionError::NotAnExtraButton(_))
        ));
    }

    #[test]
    fn test_snapshot_records_spell_ids() {
        let mut session = Session::in_memory(catalog());
        session.bind(&InputId::new("f"), Spell::new("Frostbolt", "fr.png"));
        session.bind(&InputId::new("g"), Spell::new("Attack", "attack.png"));
        session.bind(&InputId::new("h"), Spell::new("Custom", "c.png"));

        let configuration = session.snapshot("Raid", "");
        let id = |input: &str| {
            configuration.keybinds[input][&spellbind_config::ModifierLabel::Normal]
                .spell_id
                .clone()
        };
        assert_eq!(id("f").as_deref(), Some("spell-Classic-Mage-1"));
        assert_eq!(id("g").as_deref(), Some("spell-Classic-General-0"));
        assert_eq!(id("h"), None);
    }

    #[test]
    fn test_save_requires_name() {
        let mut session = Session::in_memory(catalog());
        assert!(matches!(
            session.save_configuration("  ", ""),
            Err(SessionError::EmptyName)
        ));
    }

    #[test]
    fn test_begin_load_rejects_unknown_class_without_changes() {
        let mut session = Session::in_memory(catalog());
        session.bind(&InputId::new("f"), Spell::new("Fireball", "fb.png"));

        let configuration = Configuration::builder("X")
            .expansion("Classic")
            .class_name("Druid")
            .build();
        assert!(session.begin_load(configuration).is_err());
        assert_eq!(session.keybinds().len(), 1);
        assert!(session.load_phase().is_none());
    }
}
