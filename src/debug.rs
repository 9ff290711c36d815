//! Logging infrastructure for spellbind.
//!
//! All crates log through the `log` facade. [`init_log_bridge`] installs a
//! logger that writes timestamped lines to `spellbind_debug.log` in the
//! system temp directory, keeping stdout free for command output. When
//! `RUST_LOG` is set, lines are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` > `RUST_LOG` > settings file `log_level`
//! (applied later through [`apply_settings_level`]).

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

/// Where the level in effect came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelSource {
    Cli,
    Env,
    Default,
}

struct DebugLogger {
    file: Option<File>,
    mirror_stderr: bool,
    source: LevelSource,
}

impl DebugLogger {
    fn open_file(&mut self) {
        if self.file.is_some() {
            return;
        }
        match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            Ok(f) => {
                self.file = Some(f);
                self.write_raw(&format!(
                    "\n{}\nspellbind debug session started at {} (level={})\n{}\n",
                    "=".repeat(80),
                    get_timestamp(),
                    log::max_level(),
                    "=".repeat(80)
                ));
            }
            Err(_e) => {
                // Silently fail if log file can't be opened; logging must never break a command
            }
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| {
        Mutex::new(DebugLogger {
            file: None,
            mirror_stderr: false,
            source: LevelSource::Default,
        })
    })
}

fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("spellbind_debug.log")
}

/// `log::Log` implementation writing to the debug log file
struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let mut logger = get_logger().lock();
        if logger.mirror_stderr {
            eprint!("{line}");
        }
        logger.write_raw(&line);
    }

    fn flush(&self) {
        let mut logger = get_logger().lock();
        if let Some(ref mut file) = logger.file {
            let _ = file.flush();
        }
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Parse a `RUST_LOG` value. Only the level part is used: `debug`,
/// `spellbind=trace` and `info,spellbind=debug` are all accepted.
fn parse_rust_log(value: &str) -> Option<log::LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?.trim();
            log::LevelFilter::from_str(level).ok()
        })
        .max()
}

/// Install the logger. Safe to call more than once; later calls only adjust the level.
///
/// `cli_level` is the `--log-level` override, if given.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .map(|value| parse_rust_log(&value).unwrap_or(log::LevelFilter::Info));

    let (level, source) = match (cli_level, env_level) {
        (Some(level), _) => (level, LevelSource::Cli),
        (None, Some(level)) => (level, LevelSource::Env),
        (None, None) => (log::LevelFilter::Off, LevelSource::Default),
    };

    let _ = log::set_logger(&BRIDGE);
    log::set_max_level(level);

    let mut logger = get_logger().lock();
    logger.mirror_stderr = env_level.is_some();
    logger.source = source;
    if level != log::LevelFilter::Off {
        logger.open_file();
    }
}

/// Apply the settings file level unless `--log-level` or `RUST_LOG` already decided it.
pub fn apply_settings_level(level: log::LevelFilter) {
    let mut logger = get_logger().lock();
    if logger.source != LevelSource::Default {
        return;
    }
    log::set_max_level(level);
    if level != log::LevelFilter::Off {
        logger.open_file();
    }
}

// Convenience macros for categorized logging; the category becomes the log target
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        log::error!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        log::info!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        log::debug!(target: $category, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        log::trace!(target: $category, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rust_log() {
        assert_eq!(parse_rust_log("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_rust_log("spellbind=trace"), Some(log::LevelFilter::Trace));
        assert_eq!(
            parse_rust_log("warn,spellbind=debug"),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(parse_rust_log("spellbind"), None);
    }

    #[test]
    fn test_log_path_in_temp_dir() {
        assert!(log_path().ends_with("spellbind_debug.log"));
    }
}
