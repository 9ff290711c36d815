//! Shared integration test helpers for spellbind.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{test_catalog, file_session};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use spellbind::Session;
use spellbind::config::{
    BackendError, ConfigurationStore, FileStore, KeyValueStore, MemoryStore, ProfileStore, Spell,
    SpellCatalog, Storage,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

/// Two expansions, each with General spells and two classes.
pub fn test_catalog() -> SpellCatalog {
    SpellCatalog::from_json(
        r#"{
            "Classic": {
                "General": [{"name": "Attack", "imageUrl": "attack.png"}],
                "Mage": [
                    {"name": "Fireball", "imageUrl": "fireball.png"},
                    {"name": "Frostbolt", "imageUrl": "frostbolt.png"},
                    {"name": "Blink", "imageUrl": "blink.png"}
                ],
                "Priest": [
                    {"name": "Smite", "imageUrl": "smite.png"},
                    {"name": "Renew", "imageUrl": "renew.png"}
                ]
            },
            "TBC": {
                "General": [{"name": "Auto Shot", "imageUrl": "autoshot.png"}],
                "Paladin": [{"name": "Judgement", "imageUrl": "judgement.png"}],
                "Shaman": [{"name": "Lightning Bolt", "imageUrl": "lb.png"}]
            }
        }"#,
    )
    .expect("test catalog parses")
}

/// A spell from the test catalog, by exact name.
pub fn spell(name: &str) -> Spell {
    let catalog = test_catalog();
    for expansion in catalog.expansions() {
        for class_name in catalog.classes(expansion) {
            if let Some(spell) = catalog
                .available_spells(expansion, class_name)
                .into_iter()
                .find(|spell| spell.name == name)
            {
                return spell.clone();
            }
        }
    }
    panic!("no test spell named {name}");
}

/// Session whose stores write into `dir`.
pub fn file_session(dir: &Path) -> Session {
    Session::new(
        test_catalog(),
        ConfigurationStore::new(Storage::new(FileStore::new(dir))),
        ProfileStore::new(Storage::new(FileStore::new(dir))),
    )
}

/// A temp dir plus a session persisting into it.
pub fn temp_session() -> (Session, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let session = file_session(temp_dir.path());
    (session, temp_dir)
}

/// Backend that starts failing writes once `failing` is set.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: Rc<RefCell<MemoryStore>>,
    pub failing: Rc<RefCell<bool>>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        if *self.failing.borrow() {
            return Err(BackendError::Rejected(format!("quota exceeded writing {key}")));
        }
        self.inner.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.inner.borrow_mut().remove(key)
    }
}

/// Backend that cannot be read at all, like a data file without read permission.
#[derive(Clone, Default)]
pub struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Err(BackendError::Io {
            key: key.to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Session whose stores both sit on an [`UnreadableStore`].
pub fn unreadable_session() -> Session {
    Session::new(
        test_catalog(),
        ConfigurationStore::new(Storage::new(UnreadableStore)),
        ProfileStore::new(Storage::new(UnreadableStore)),
    )
}
