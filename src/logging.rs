//! `tracing` subscriber setup.
//!
//! Subcommands log to stderr. The TUI owns the terminal, so it logs to a file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;

/// Log file used while the TUI is running.
pub const TUI_LOG_FILE: &str = "loan-schedule.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber. Call once, before any work is done.
pub fn init(config: &Config, target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| AppError::input(format!("Invalid LOAN_LOG filter '{}': {e}", config.log_filter)))?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::input(format!("Failed to open log file '{}': {e}", path.display())))?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
        }
    };

    result.map_err(|e| AppError::input(format!("Failed to initialize logging: {e}")))
}
