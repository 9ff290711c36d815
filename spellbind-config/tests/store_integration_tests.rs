//! Integration tests for spellbind-config.
//!
//! These exercise the configuration and profile stores end to end against a
//! real `FileStore` directory, including the documents written by the browser
//! version of the editor.

use std::collections::BTreeMap;

use spellbind_config::{
    Configuration, ConfigurationStore, FileStore, KeyValueStore, ModifierLabel, ProfileEntry,
    ProfileStore, Spell, Storage, StoreError, StoredKeybinds, StoredSpell,
};
use tempfile::tempdir;

fn mage_keybinds() -> StoredKeybinds {
    let mut keybinds = StoredKeybinds::new();
    let mut f = BTreeMap::new();
    f.insert(
        ModifierLabel::Normal,
        StoredSpell::from_spell(&Spell::new("Fireball", "fb.png"), None),
    );
    f.insert(
        ModifierLabel::CtrlShift,
        StoredSpell::from_spell(&Spell::new("Blink", "blink.png"), None),
    );
    keybinds.insert("f".to_string(), f);
    keybinds
}

fn file_storage(dir: &std::path::Path) -> Storage {
    Storage::new(FileStore::new(dir))
}

// ---------------------------------------------------------------------------
// Configuration store on disk
// ---------------------------------------------------------------------------

#[test]
fn configurations_survive_reopen() {
    let temp = tempdir().unwrap();
    let mut store = ConfigurationStore::new(file_storage(temp.path()));
    store
        .save(
            Configuration::builder("Raid")
                .expansion("Classic")
                .class_name("Mage")
                .keybinds(mage_keybinds())
                .build(),
        )
        .unwrap();
    assert!(temp.path().join("wow-keybinds.json").exists());

    let mut reopened = ConfigurationStore::new(file_storage(temp.path()));
    let loaded = reopened.load("Raid").unwrap();
    assert_eq!(loaded.keybinds, mage_keybinds());
    assert_eq!(reopened.current(), Some("Raid"));
}

#[test]
fn save_delete_load_is_not_found() {
    let temp = tempdir().unwrap();
    let mut store = ConfigurationStore::new(file_storage(temp.path()));
    store
        .save(
            Configuration::builder("Raid")
                .expansion("Classic")
                .class_name("Mage")
                .build(),
        )
        .unwrap();
    store.delete("Raid").unwrap();

    match store.load("Raid") {
        Err(StoreError::NotFound { kind, name }) => {
            assert_eq!(kind, "configuration");
            assert_eq!(name, "Raid");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn reads_document_written_by_browser_version() {
    let temp = tempdir().unwrap();
    let mut backend = FileStore::new(temp.path());
    backend
        .set(
            "wow-keybinds",
            r#"{"Old":{"name":"Old","description":"d","expansion":"Classic","class":"Mage",
               "timestamp":"2024-01-02T03:04:05.678Z",
               "keybinds":{"mouse-left":{"ctrlAltShift":{"spellName":"Polymorph","spellImageUrl":"poly.png"}}}}}"#,
        )
        .unwrap();

    let mut store = ConfigurationStore::new(Storage::new(backend));
    let configuration = store.load("Old").unwrap();
    assert_eq!(configuration.class_name, "Mage");
    let spell = configuration.keybinds["mouse-left"][&ModifierLabel::CtrlAltShift].to_spell();
    assert_eq!(spell, Spell::new("Polymorph", "poly.png"));
}

#[test]
fn export_file_lands_in_directory() {
    let temp = tempdir().unwrap();
    let mut store = ConfigurationStore::in_memory();
    store
        .save(Configuration::builder("Raid Night!").keybinds(mage_keybinds()).build())
        .unwrap();

    let exported = store.export("Raid Night!").unwrap();
    let path = exported.write_to(&temp.path().join("exports")).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Raid_Night__keybinds.json"
    );

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut other = ConfigurationStore::in_memory();
    let imported = other.import(&contents).unwrap();
    assert_eq!(imported.keybinds, mage_keybinds());
}

#[test]
fn import_overwrites_on_name_collision() {
    let mut store = ConfigurationStore::in_memory();
    store
        .save(Configuration::builder("Raid").description("old").build())
        .unwrap();
    store
        .import(r#"{"name":"Raid","description":"new","keybinds":{}}"#)
        .unwrap();

    let list = store.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].description, "new");
}

// ---------------------------------------------------------------------------
// Profile store on disk
// ---------------------------------------------------------------------------

#[test]
fn profile_branches_accumulate_on_disk() {
    let temp = tempdir().unwrap();
    let mut store = ProfileStore::new(file_storage(temp.path()));
    store
        .save(
            "Main",
            "",
            "Classic",
            "Mage",
            ProfileEntry::new(mage_keybinds(), Default::default()),
        )
        .unwrap();
    store
        .save("Main", "", "Classic", "Priest", ProfileEntry::default())
        .unwrap();

    let mut reopened = ProfileStore::new(file_storage(temp.path()));
    let profile = reopened.load("Main").unwrap();
    assert_eq!(profile.branches().len(), 2);
    assert_eq!(
        profile.entry("Classic", "Mage").unwrap().keybinds,
        mage_keybinds()
    );

    let raw = std::fs::read_to_string(temp.path().join("wowProfiles.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.is_array());
    let stored = &json[0]["data"]["Classic"]["Mage"]["keybinds"]["f"]["normal"];
    assert_eq!(stored["spellName"], "Fireball");
}
