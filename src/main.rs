//! lapwatch - a CLI stopwatch with laps and a sticky color theme.
//!
//! Elapsed time, laps, and the running flag are persisted in a local
//! key-value store, so a stopwatch started in one invocation keeps counting
//! and can be paused, lapped, or watched from the next.

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_lap_lines, format_laps_table, format_status, run_watch, StopwatchService,
    ThemeController, ThemeSource,
};
use cli::{Cli, Commands};
use domain::{AppError, KvStore, SystemClock, ThemePreference};
use infrastructure::{
    ensure_config_exists, load_config, AppConfig, MemoryStore, SqliteStore, TerminalThemeSignal,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    if let Err(e) = ensure_config_exists() {
        tracing::warn!(error = %e, "Could not create default config file");
    }

    let config = load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load config, using defaults");
        AppConfig::default()
    });

    let store = open_store(&config);

    match cli.command {
        Commands::Start => cmd_start(store.as_ref()),
        Commands::Pause => cmd_pause(store.as_ref()),
        Commands::Reset => cmd_reset(store.as_ref()),
        Commands::Lap => cmd_lap(store.as_ref()),
        Commands::Status => cmd_status(store.as_ref()),
        Commands::Laps { plain } => cmd_laps(store.as_ref(), plain),
        Commands::Watch => cmd_watch(store.as_ref(), &config),
        Commands::Theme { mode } => cmd_theme(store.as_ref(), mode.as_deref()),
        Commands::Paths => cmd_paths(&config),
    }
}

/// Open the SQLite store, degrading to a volatile in-memory store when the
/// database is unusable. The stopwatch keeps working either way.
fn open_store(config: &AppConfig) -> Box<dyn KvStore> {
    let db_path = config.store_db_path();
    match SqliteStore::open(&db_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(
                path = %db_path.display(),
                error = %e,
                "Could not open state database, state will not persist"
            );
            Box::new(MemoryStore::new())
        }
    }
}

/// Start or resume the stopwatch.
fn cmd_start(store: &dyn KvStore) -> domain::Result<()> {
    let clock = SystemClock;
    let mut service = StopwatchService::load(store, &clock);

    if service.start() {
        println!(
            "{} Started at {}",
            "▶".green().bold(),
            service.formatted_elapsed()
        );
    } else {
        println!(
            "Already running at {}",
            service.formatted_elapsed()
        );
    }

    Ok(())
}

/// Pause the stopwatch.
fn cmd_pause(store: &dyn KvStore) -> domain::Result<()> {
    let clock = SystemClock;
    let mut service = StopwatchService::load(store, &clock);

    if service.pause() {
        println!(
            "{} Paused at {}",
            "⏸".yellow().bold(),
            service.formatted_elapsed()
        );
    } else {
        println!("Not running ({})", service.formatted_elapsed());
    }

    Ok(())
}

/// Reset elapsed time and laps. The theme preference stays.
fn cmd_reset(store: &dyn KvStore) -> domain::Result<()> {
    let clock = SystemClock;
    let mut service = StopwatchService::load(store, &clock);

    let dropped_laps = service.laps().len();
    service.reset();

    if dropped_laps > 0 {
        println!("{} Reset (cleared {dropped_laps} laps)", "↺".bold());
    } else {
        println!("{} Reset", "↺".bold());
    }

    Ok(())
}

/// Record a lap at the current elapsed time.
fn cmd_lap(store: &dyn KvStore) -> domain::Result<()> {
    let clock = SystemClock;
    let mut service = StopwatchService::load(store, &clock);

    match service.record_lap() {
        Some(time) => {
            println!(
                "{} Lap {}: {}",
                "✓".green().bold(),
                service.laps().len(),
                time
            );
        }
        None => {
            println!(
                "{} Stopwatch is not running, no lap recorded",
                "!".yellow().bold()
            );
        }
    }

    Ok(())
}

/// Show phase, elapsed time, and lap count.
fn cmd_status(store: &dyn KvStore) -> domain::Result<()> {
    let clock = SystemClock;
    let signal = TerminalThemeSignal;
    let service = StopwatchService::load(store, &clock);
    let theme = ThemeController::new(store, &signal);
    let (dark, _) = theme.effective();

    println!(
        "{}",
        format_status(
            service.phase(),
            &service.formatted_elapsed(),
            service.laps().len(),
            dark
        )
    );

    Ok(())
}

/// List recorded laps, as a table or as plain lines.
fn cmd_laps(store: &dyn KvStore, plain: bool) -> domain::Result<()> {
    let clock = SystemClock;
    let service = StopwatchService::load(store, &clock);

    if service.laps().is_empty() {
        println!("No laps recorded");
        return Ok(());
    }

    if plain {
        for line in format_lap_lines(service.laps()) {
            println!("{line}");
        }
    } else {
        println!("{}", format_laps_table(service.laps()));
    }

    Ok(())
}

/// Live display until Ctrl-C.
fn cmd_watch(store: &dyn KvStore, config: &AppConfig) -> domain::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::io("Failed to start the watch runtime", e))?;

    let clock = SystemClock;
    let signal = TerminalThemeSignal;
    let service = StopwatchService::load(store, &clock);
    let theme = ThemeController::new(store, &signal);

    runtime.block_on(run_watch(
        &service,
        &theme,
        config.display.tick_ms,
        config.persist.interval_secs,
    ))
}

/// Show or change the theme.
fn cmd_theme(store: &dyn KvStore, mode: Option<&str>) -> domain::Result<()> {
    let signal = TerminalThemeSignal;
    let theme = ThemeController::new(store, &signal);

    match mode {
        None => {
            let (dark, source) = theme.effective();
            let name = if dark { "dark" } else { "light" };
            let origin = match source {
                ThemeSource::Stored => "set explicitly",
                ThemeSource::System => "following system",
            };
            println!("Theme: {} ({origin})", name.bold());
        }
        Some("system") => {
            theme.clear_preference();
            let (dark, _) = theme.effective();
            println!(
                "Theme preference cleared, following system ({})",
                if dark { "dark" } else { "light" }
            );
        }
        Some(value) => {
            let pref: ThemePreference = value
                .parse()
                .map_err(|e: String| AppError::Config { message: e })?;
            theme.set_preference(pref);
            println!("{} Theme set to {}", "✓".green().bold(), pref);
        }
    }

    Ok(())
}

/// Show the paths in use.
fn cmd_paths(config: &AppConfig) -> domain::Result<()> {
    println!("{}", "📂 lapwatch paths".bold());
    println!();
    println!("  data dir: {}", config.data_dir().display());
    println!("  state db: {}", config.store_db_path().display());
    println!("  config:   {}", config.config_file_path().display());

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
