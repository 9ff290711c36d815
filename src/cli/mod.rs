//! Command-line interface for spellbind.
//!
//! This module handles argument parsing. Command implementations live in the
//! [`commands`] submodule.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// spellbind - keybind editor for spell bars
#[derive(Parser)]
#[command(name = "spellbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set debug log level (overrides settings and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Directory holding saved configurations and profiles
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Spell catalog JSON file
    #[arg(long, value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Manage saved configurations
    #[command(subcommand)]
    Configs(ConfigsCommand),

    /// Manage profiles
    #[command(subcommand)]
    Profiles(ProfilesCommand),

    /// List expansions, or the classes and spells of one expansion
    Catalog {
        /// Expansion to show
        expansion: Option<String>,
    },

    /// Run a scripted editing session
    Bind(BindArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigsCommand {
    /// List saved configurations
    List,

    /// Show one configuration's bindings
    Show { name: String },

    /// Delete a configuration
    Delete { name: String },

    /// Write a configuration to `<name>_keybinds.json`
    Export {
        name: String,

        /// Directory to write to (default: settings `export_dir`, else current dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Import an exported configuration file
    Import { file: PathBuf },

    /// Print a configuration's share string
    Share { name: String },

    /// Import a configuration from a share string
    ImportShare { share: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfilesCommand {
    /// List profiles
    List,

    /// Show one profile's branches
    Show { name: String },

    /// Delete a profile
    Delete { name: String },
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct BindArgs {
    /// Expansion to select
    #[arg(long)]
    pub expansion: String,

    /// Class to select
    #[arg(long = "class", value_name = "CLASS")]
    pub class_name: String,

    /// Start from a saved configuration
    #[arg(long, value_name = "CONFIG")]
    pub from: Option<String>,

    /// Activate a profile (its branch for the selection is applied)
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Binding to add, e.g. "Ctrl+F=Frostbolt" (repeatable)
    #[arg(long = "bind", value_name = "KEY=SPELL")]
    pub binds: Vec<String>,

    /// Binding to remove, e.g. "Shift+Q" (repeatable)
    #[arg(long = "unbind", value_name = "KEY")]
    pub unbinds: Vec<String>,

    /// Save the result as a configuration
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,

    /// Description stored with --save
    #[arg(long, requires = "save")]
    pub description: Option<String>,

    /// Merge the result into a profile
    #[arg(long, value_name = "NAME")]
    pub save_profile: Option<String>,
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug)]
pub struct RuntimeOptions {
    /// Command to run
    pub command: Commands,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
    /// Data directory override
    pub data_dir: Option<PathBuf>,
    /// Catalog path override
    pub catalog: Option<PathBuf>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
            data_dir: cli.data_dir,
            catalog: cli.catalog,
        }
    }
}

/// Result of CLI processing
pub enum CliResult {
    /// Run the parsed command
    Continue(RuntimeOptions),
    /// Exit with the given code (help, version, or a parse error was printed)
    Exit(i32),
}

/// Parse CLI arguments.
pub fn process_cli() -> CliResult {
    match Cli::try_parse() {
        Ok(cli) => CliResult::Continue(cli.into()),
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            CliResult::Exit(code)
        }
    }
}
