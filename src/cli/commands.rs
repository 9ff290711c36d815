//! Command implementations.
//!
//! Every command writes its report to the given writer so it can be
//! captured in tests; `main` passes stdout.

use super::{BindArgs, Commands, ConfigsCommand, ProfilesCommand, RuntimeOptions};
use crate::session::Session;
use anyhow::{Context, Result, bail};
use spellbind_config::{
    Configuration, ConfigurationStore, FileStore, Profile, ProfileStore, Settings, SpellCatalog,
    Storage, StoredKeybinds,
};
use spellbind_keybindings::{KeybindMap, parse_assignment, parse_binding};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Resolved locations and settings shared by all commands.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub export_dir: PathBuf,
    pub settings: Settings,
    /// Where to persist settings changes (`last_profile`); `None` leaves the file alone
    pub settings_path: Option<PathBuf>,
}

impl CommandContext {
    /// Apply CLI overrides on top of the settings file.
    pub fn new(options: &RuntimeOptions, settings: Settings) -> Self {
        Self {
            data_dir: options
                .data_dir
                .clone()
                .unwrap_or_else(|| settings.effective_data_dir()),
            catalog_path: options
                .catalog
                .clone()
                .unwrap_or_else(|| settings.effective_catalog_path()),
            export_dir: settings.effective_export_dir(),
            settings,
            settings_path: None,
        }
    }

    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    fn configuration_store(&self) -> ConfigurationStore {
        ConfigurationStore::new(Storage::new(FileStore::new(self.data_dir.clone())))
    }

    fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(Storage::new(FileStore::new(self.data_dir.clone())))
    }

    fn load_catalog(&self) -> Result<SpellCatalog> {
        let catalog = SpellCatalog::load(&self.catalog_path).with_context(|| {
            format!("Failed to load spell catalog from {:?}", self.catalog_path)
        })?;
        if catalog.is_empty() {
            bail!("Spell catalog {:?} has no expansions", self.catalog_path);
        }
        Ok(catalog)
    }

    /// Session over the file-backed stores, on the settings' default expansion
    /// when the catalog has it.
    pub fn open_session(&self) -> Result<Session> {
        let mut session = Session::new(
            self.load_catalog()?,
            self.configuration_store(),
            self.profile_store(),
        );
        if let Some(expansion) = self.settings.default_expansion.as_deref()
            && let Err(e) = session.select_expansion(expansion)
        {
            log::warn!("Ignoring default_expansion setting: {}", e);
        }
        Ok(session)
    }

    fn remember_profile(&mut self, name: &str) -> Result<()> {
        let Some(path) = self.settings_path.clone() else {
            return Ok(());
        };
        if self.settings.last_profile.as_deref() == Some(name) {
            return Ok(());
        }
        self.settings.last_profile = Some(name.to_string());
        self.settings.save_to(&path)
    }
}

/// Run one command.
pub fn run(command: &Commands, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Configs(command) => run_configs(command, ctx, out),
        Commands::Profiles(command) => run_profiles(command, ctx, out),
        Commands::Catalog { expansion } => run_catalog(expansion.as_deref(), ctx, out),
        Commands::Bind(args) => run_bind(args, ctx, out),
    }
}

// ============================================================================
// configs
// ============================================================================

fn run_configs(
    command: &ConfigsCommand,
    ctx: &CommandContext,
    out: &mut dyn Write,
) -> Result<()> {
    let mut store = ctx.configuration_store();

    match command {
        ConfigsCommand::List => {
            let configurations = store.list()?;
            if configurations.is_empty() {
                writeln!(out, "No saved configurations")?;
            }
            for configuration in &configurations {
                write_configuration_line(out, configuration)?;
            }
        }
        ConfigsCommand::Show { name } => {
            let configuration = store.load(name)?;
            write_configuration_line(out, &configuration)?;
            if !configuration.description.is_empty() {
                writeln!(out, "  {}", configuration.description)?;
            }
            write_bindings(out, &configuration.keybinds)?;
            for (input, label) in &configuration.custom_labels {
                writeln!(out, "  label {input}: {label}")?;
            }
        }
        ConfigsCommand::Delete { name } => {
            if store.delete(name)? {
                writeln!(out, "Deleted configuration '{name}'")?;
            } else {
                writeln!(out, "No configuration named '{name}'")?;
            }
        }
        ConfigsCommand::Export { name, out: dir } => {
            let exported = store.export(name)?;
            let dir = dir.clone().unwrap_or_else(|| ctx.export_dir.clone());
            let path = exported
                .write_to(&dir)
                .with_context(|| format!("Failed to write export into {:?}", dir))?;
            debug_info!("cli", "Exported '{}' to {:?}", name, path);
            writeln!(out, "Exported '{}' to {}", name, path.display())?;
        }
        ConfigsCommand::Import { file } => {
            let contents = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let configuration = store.import(&contents)?;
            writeln!(out, "Imported configuration '{}'", configuration.name)?;
        }
        ConfigsCommand::Share { name } => {
            writeln!(out, "{}", store.share_string(name)?)?;
        }
        ConfigsCommand::ImportShare { share } => {
            let configuration = store.import_share_string(share)?;
            writeln!(out, "Imported configuration '{}'", configuration.name)?;
        }
    }
    Ok(())
}

fn write_configuration_line(out: &mut dyn Write, configuration: &Configuration) -> Result<()> {
    writeln!(
        out,
        "{}  {}/{}  {} bindings  saved {}",
        configuration.name,
        configuration.expansion,
        configuration.class_name,
        configuration.binding_count(),
        configuration.timestamp.format("%Y-%m-%d %H:%M")
    )?;
    Ok(())
}

fn write_bindings(out: &mut dyn Write, keybinds: &StoredKeybinds) -> Result<()> {
    let map = KeybindMap::from_snapshot(keybinds);
    for (key, spell) in map.sorted() {
        writeln!(out, "  {:<24} {}", key.describe(), spell.name)?;
    }
    Ok(())
}

// ============================================================================
// profiles
// ============================================================================

fn run_profiles(
    command: &ProfilesCommand,
    ctx: &mut CommandContext,
    out: &mut dyn Write,
) -> Result<()> {
    let mut store = ctx.profile_store();

    match command {
        ProfilesCommand::List => {
            let profiles = store.list()?;
            if profiles.is_empty() {
                writeln!(out, "No profiles")?;
            }
            for profile in &profiles {
                write_profile_line(out, profile)?;
            }
        }
        ProfilesCommand::Show { name } => {
            let profile = store.load(name)?;
            write_profile_line(out, &profile)?;
            for (expansion, class_name) in profile.branches() {
                writeln!(out, "[{expansion}/{class_name}]")?;
                if let Some(entry) = profile.entry(expansion, class_name) {
                    write_bindings(out, &entry.keybinds)?;
                }
            }
        }
        ProfilesCommand::Delete { name } => {
            if store.delete(name)? {
                writeln!(out, "Deleted profile '{name}'")?;
                if ctx.settings.last_profile.as_deref() == Some(name.as_str()) {
                    ctx.settings.last_profile = None;
                    if let Some(path) = &ctx.settings_path {
                        ctx.settings.save_to(path)?;
                    }
                }
            } else {
                writeln!(out, "No profile named '{name}'")?;
            }
        }
    }
    Ok(())
}

fn write_profile_line(out: &mut dyn Write, profile: &Profile) -> Result<()> {
    let branches = profile.branches().len();
    if profile.description.is_empty() {
        writeln!(out, "{}  {} branches", profile.name, branches)?;
    } else {
        writeln!(
            out,
            "{}  {} branches  {}",
            profile.name, branches, profile.description
        )?;
    }
    Ok(())
}

// ============================================================================
// catalog
// ============================================================================

fn run_catalog(
    expansion: Option<&str>,
    ctx: &CommandContext,
    out: &mut dyn Write,
) -> Result<()> {
    let catalog = ctx.load_catalog()?;

    let Some(expansion) = expansion else {
        for expansion in catalog.expansions() {
            writeln!(out, "{expansion}")?;
        }
        return Ok(());
    };
    if !catalog.has_expansion(expansion) {
        bail!("Unknown expansion '{}'", expansion);
    }

    let general = catalog.general_spells(expansion);
    if !general.is_empty() {
        writeln!(out, "General")?;
        for spell in general {
            writeln!(out, "  {}", spell.name)?;
        }
    }
    for class_name in catalog.classes(expansion) {
        writeln!(out, "{class_name}")?;
        for spell in catalog.class_spells(expansion, class_name) {
            writeln!(out, "  {}", spell.name)?;
        }
    }
    Ok(())
}

// ============================================================================
// bind
// ============================================================================

fn run_bind(args: &BindArgs, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    let mut session = ctx.open_session()?;
    session.select(&args.expansion, &args.class_name)?;

    let profile = args
        .profile
        .as_deref()
        .or(ctx.settings.last_profile.as_deref())
        .map(str::to_string);
    if let Some(profile) = &profile {
        session
            .switch_profile(Some(profile.as_str()))
            .with_context(|| format!("Failed to activate profile '{profile}'"))?;
    }

    if let Some(from) = &args.from {
        let configuration = session.find_configuration(from)?;
        if configuration.expansion != args.expansion || configuration.class_name != args.class_name
        {
            bail!(
                "Configuration '{}' is for {}/{}, not {}/{}",
                from,
                configuration.expansion,
                configuration.class_name,
                args.expansion,
                args.class_name
            );
        }
        session.begin_load(configuration)?;
    }

    for assignment in &args.binds {
        let (key, spell_name) = parse_assignment(assignment)?;
        let previous = session.bind_spell_named(key.clone(), &spell_name)?;
        debug_log!("cli", "Bound {} to {}", key, spell_name);
        if let Some(previous) = previous {
            writeln!(out, "{}: replaced {}", key.describe(), previous.name)?;
        }
    }
    for binding in &args.unbinds {
        let key = parse_binding(binding)?;
        if session.unbind_key(&key).is_none() {
            writeln!(out, "{}: was not bound", key.describe())?;
        }
    }

    writeln!(out, "{}/{}", session.expansion(), session.class_name())?;
    for (key, spell) in session.keybinds().sorted() {
        writeln!(out, "  {:<24} {}", key.describe(), spell.name)?;
    }

    if let Some(name) = &args.save {
        let description = args.description.as_deref().unwrap_or_default();
        session.save_configuration(name, description)?;
        writeln!(out, "Saved configuration '{}'", name.trim())?;
    }
    if let Some(name) = &args.save_profile {
        session.save_profile(name, "")?;
        ctx.remember_profile(name.trim())?;
        writeln!(out, "Saved profile '{}'", name.trim())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "Classic": {
            "General": [{"name": "Attack", "imageUrl": "attack.png"}],
            "Mage": [
                {"name": "Fireball", "imageUrl": "fb.png"},
                {"name": "Frostbolt", "imageUrl": "fr.png"}
            ]
        }
    }"#;

    fn context(dir: &TempDir) -> CommandContext {
        let catalog = dir.path().join("spells.json");
        fs::write(&catalog, CATALOG).unwrap();
        let cli = Cli::try_parse_from([
            "spellbind",
            "--data-dir",
            dir.path().join("data").to_str().unwrap(),
            "--catalog",
            catalog.to_str().unwrap(),
            "catalog",
        ])
        .unwrap();
        CommandContext::new(&RuntimeOptions::from(cli), Settings::default())
    }

    fn run_args(ctx: &mut CommandContext, args: &[&str]) -> Result<String> {
        let mut argv = vec!["spellbind"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(&cli.command, ctx, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_catalog_lists_classes_and_spells() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        assert_eq!(run_args(&mut ctx, &["catalog"]).unwrap(), "Classic\n");
        let listing = run_args(&mut ctx, &["catalog", "Classic"]).unwrap();
        assert!(listing.starts_with("General\n  Attack\nMage\n  Fireball\n"));
        assert!(run_args(&mut ctx, &["catalog", "TBC"]).is_err());
    }

    #[test]
    fn test_bind_save_then_show() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let output = run_args(
            &mut ctx,
            &[
                "bind", "--expansion", "Classic", "--class", "Mage", "--bind",
                "Ctrl+F=frostbolt", "--bind", "Q=Fireball", "--save", "Raid",
            ],
        )
        .unwrap();
        assert!(output.contains("Ctrl + F"));
        assert!(output.contains("Saved configuration 'Raid'"));

        let shown = run_args(&mut ctx, &["configs", "show", "Raid"]).unwrap();
        assert!(shown.starts_with("Raid  Classic/Mage  2 bindings"));
        assert!(shown.contains("Frostbolt"));
    }

    #[test]
    fn test_bind_unknown_spell_fails() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let result = run_args(
            &mut ctx,
            &["bind", "--expansion", "Classic", "--class", "Mage", "--bind", "F=Smite"],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bind_starts_from_saved_configuration() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        run_args(
            &mut ctx,
            &["bind", "--expansion", "Classic", "--class", "Mage", "--save", "Empty"],
        )
        .unwrap();
        let output = run_args(
            &mut ctx,
            &[
                "bind", "--expansion", "Classic", "--class", "Mage", "--from", "Empty",
                "--bind", "1=Attack",
            ],
        )
        .unwrap();
        assert!(output.contains("Attack"));
    }

    #[test]
    fn test_missing_configuration_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let err = run_args(&mut ctx, &["configs", "show", "Nope"]).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(
            run_args(&mut ctx, &["configs", "delete", "Nope"]).unwrap(),
            "No configuration named 'Nope'\n"
        );
    }
}
