//! Terminon - a multi-session terminal host.
//!
//! Main entry point for the application.

mod app;
mod cli;
mod commands;
mod input;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, info};

/// Create the config, data and log directories.
fn init_paths() -> Result<()> {
    terminon_paths::ensure_app_dirs().context("Failed to create application directories")
}

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("TERMINON_DEBUG").is_ok()
}

/// Initialize the logging system.
///
/// The front-end owns the TTY, so everything goes to the log file.
fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "terminon=trace,info"
    } else {
        "terminon=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let path = terminon_paths::log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    if is_debug_mode() {
        info!(
            "Terminon v{} starting up (DEBUG MODE ENABLED)",
            env!("CARGO_PKG_VERSION")
        );
    } else {
        info!("Terminon v{} starting up", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_paths()?;
    init_logging()?;

    if let Some(path) = settings::ensure_config_file() {
        debug!("Using config file {:?}", path);
    }
    let config = settings::load_config();

    match cli.command {
        None => app::run(&config, cli.profile.as_deref()),
        Some(Command::Profile { command }) => {
            let mut manager = commands::open_config();
            commands::profile(command, &mut manager, &mut std::io::stdout().lock())
        }
        Some(Command::Theme { command }) => {
            let mut manager = commands::open_config();
            commands::theme(command, &mut manager, &mut std::io::stdout().lock())
        }
    }
}
