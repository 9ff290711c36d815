use spellbind::cli::{self, commands};
use spellbind_config::Settings;

fn main() {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => std::process::exit(code),
        cli::CliResult::Continue(options) => options,
    };
    // Route log::info!() etc. to <temp>/spellbind_debug.log.
    // CLI --log-level takes precedence, then RUST_LOG, then settings (applied below).
    spellbind::debug::init_log_bridge(options.log_level);

    log::info!("Starting spellbind {}", spellbind::VERSION);

    let settings_path = Settings::settings_path();
    let settings = match Settings::load_from(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("spellbind: warning: {e:#}, using default settings");
            Settings::default()
        }
    };
    spellbind::debug::apply_settings_level(settings.log_level.to_level_filter());

    let mut ctx =
        commands::CommandContext::new(&options, settings).with_settings_path(settings_path);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::run(&options.command, &mut ctx, &mut stdout) {
        log::error!("Command failed: {e:#}");
        eprintln!("spellbind: error: {e:#}");
        std::process::exit(1);
    }
}
