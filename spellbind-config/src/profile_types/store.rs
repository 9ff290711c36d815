//! Persistent profile store.
//!
//! Profiles are stored as a JSON array under the `wowProfiles` document key.
//! Like the configuration store, every mutation is a whole-document
//! read-modify-write.

use super::manager::ProfileManager;
use super::profile::{Profile, ProfileEntry};
use crate::error::StoreError;
use crate::storage::{PROFILES_KEY, Storage};

/// Profiles persisted in a [`Storage`].
#[derive(Debug)]
pub struct ProfileStore {
    storage: Storage,
}

impl ProfileStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(Storage::in_memory())
    }

    pub fn is_degraded(&self) -> bool {
        self.storage.is_degraded()
    }

    fn read(&mut self) -> Result<ProfileManager, StoreError> {
        let profiles: Vec<Profile> = self.storage.read_document(PROFILES_KEY)?;
        log::debug!("Read {} profiles", profiles.len());
        Ok(ProfileManager::from_profiles(profiles))
    }

    fn write(&mut self, manager: &ProfileManager) -> Result<(), StoreError> {
        self.storage.write_document(PROFILES_KEY, &manager.to_vec())
    }

    /// Merge one (expansion, class) snapshot into the named profile, creating
    /// it when absent. Returns the profile as saved.
    pub fn save(
        &mut self,
        name: &str,
        description: &str,
        expansion: &str,
        class_name: &str,
        entry: ProfileEntry,
    ) -> Result<Profile, StoreError> {
        let mut manager = self.read()?;
        let saved = manager
            .merge_entry(name, description, expansion, class_name, entry)
            .clone();
        log::info!(
            "Saved profile '{}' branch {}/{} ({} branches total)",
            name,
            expansion,
            class_name,
            saved.branches().len()
        );
        self.write(&manager)?;
        Ok(saved)
    }

    /// Look up a profile. Applying it is the session's job.
    pub fn load(&mut self, name: &str) -> Result<Profile, StoreError> {
        self.read()?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::profile_not_found(name))
    }

    /// All profiles in creation order.
    pub fn list(&mut self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.read()?.to_vec())
    }

    /// Remove a profile. Removing a missing name is not an error.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut manager = self.read()?;
        if manager.remove(name).is_none() {
            return Ok(false);
        }
        log::info!("Deleted profile '{}'", name);
        self.write(&manager)?;
        Ok(true)
    }
}
