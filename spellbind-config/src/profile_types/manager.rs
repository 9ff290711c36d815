//! Profile collection management.
//!
//! Provides `ProfileManager`, which keeps profiles in display order, finds them
//! by name and merges saved (expansion, class) snapshots into existing profiles.

use super::profile::{Profile, ProfileEntry};

/// Manages a collection of profiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileManager {
    /// Profiles in display (creation) order
    profiles: Vec<Profile>,
}

impl ProfileManager {
    /// Create a new empty profile manager
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
        }
    }

    /// Create a profile manager from a list of profiles.
    ///
    /// Later duplicates of a name replace earlier ones.
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let mut manager = Self::new();
        for profile in profiles {
            manager.add(profile);
        }
        manager
    }

    /// Add a profile, replacing one with the same name in place
    pub fn add(&mut self, profile: Profile) {
        match self.position(&profile.name) {
            Some(pos) => self.profiles[pos] = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Get a mutable reference to a profile by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }

    /// Remove a profile by name
    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        let pos = self.position(name)?;
        Some(self.profiles.remove(pos))
    }

    /// Merge one (expansion, class) snapshot into the named profile.
    ///
    /// Creates the profile when missing. Otherwise only the touched branch is
    /// replaced and the description updated; other branches are left untouched.
    pub fn merge_entry(
        &mut self,
        name: &str,
        description: &str,
        expansion: &str,
        class_name: &str,
        entry: ProfileEntry,
    ) -> &Profile {
        let pos = match self.position(name) {
            Some(pos) => pos,
            None => {
                self.profiles.push(Profile::new(name));
                self.profiles.len() - 1
            }
        };
        let profile = &mut self.profiles[pos];
        profile.description = description.to_string();
        profile.set_entry(expansion, class_name, entry);
        &self.profiles[pos]
    }

    /// Find a profile by name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&Profile> {
        let lower = name.to_lowercase();
        self.profiles.iter().find(|p| p.name.to_lowercase() == lower)
    }

    /// Get all profiles in display order
    pub fn profiles_ordered(&self) -> &[Profile] {
        &self.profiles
    }

    /// Profile names in display order
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Get all profiles as a vector (for serialization)
    pub fn to_vec(&self) -> Vec<Profile> {
        self.profiles.clone()
    }

    /// Get the number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if there are no profiles
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.name == name)
    }
}
