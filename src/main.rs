//! Redstone Tools - macro manager and block-state encoder
//!
//! Edits the macro file used by the Redstone Tools mod and encodes block
//! states into command argument strings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redstone_tools::cli::{self, MacroCommand};
use redstone_tools::macros::{DefaultReason, LoadOutcome, MacroStore};
use redstone_tools::{AppConfig, AppPaths, ConsoleSink};

/// Redstone Tools - manage macros and encode block states
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "REDSTONE_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the macro file (overrides the configuration)
    #[arg(short, long, env = "REDSTONE_TOOLS_MACROS")]
    macros: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Macro(MacroCommand),

    /// Open the interactive macro editor
    Repl,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let paths = AppPaths::detect();

    let config_path = args.config.clone().unwrap_or_else(|| paths.config.clone());
    let config = AppConfig::load(&config_path)?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let log_dir = if config.logging.file {
        paths.ensure_directories()?;
        Some(paths.logs_dir.as_path())
    } else {
        None
    };
    let _log_guard = init_logging(&level, log_dir)?;

    info!("Configuration file: {}", config_path.display());

    let macros_path = args
        .macros
        .clone()
        .unwrap_or_else(|| config.macros_path(&paths));
    let mut store = MacroStore::open_with(&macros_path, config.store_options())
        .with_context(|| format!("Failed to load macros from {}", macros_path.display()))?;

    match store.load_outcome() {
        LoadOutcome::Loaded { count } => info!("Loaded {} macros", count),
        LoadOutcome::Defaulted(DefaultReason::Missing) => {
            info!("Using default macros (no file yet)")
        }
        LoadOutcome::Defaulted(reason) => warn!("Using default macros: {:?}", reason),
    }

    let mut sink = ConsoleSink::new("console");

    match args.command.unwrap_or(Command::Macro(MacroCommand::List)) {
        Command::Macro(command) => cli::execute(command, &mut store, &mut sink)?,
        Command::Repl => cli::run_repl(&mut store, &mut sink)?,
    }

    Ok(())
}

fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "redstone-tools.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
