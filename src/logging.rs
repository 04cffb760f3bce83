//! File logging setup
//!
//! The TUI owns stdout, so tracing output goes to a log file in the cache
//! directory unless `--log-file` names another one.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::cache::DiskCache;
use crate::cli::StartupConfig;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_DIRECTIVE: &str = "fxconvert=info";

/// File name of the default log file
const LOG_FILE_NAME: &str = "fxconvert.log";

/// Errors that prevent logging from being set up
#[derive(Debug, Error)]
pub enum LoggingError {
    /// No `--log-file` and no platform cache directory
    #[error("No location for the log file; pass --log-file")]
    NoLogPath,

    /// The log file could not be opened
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber was already installed
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Where logs go for this configuration
pub fn log_path(config: &StartupConfig) -> Option<PathBuf> {
    config
        .log_file
        .clone()
        .or_else(|| DiskCache::default_dir().map(|dir| dir.join(LOG_FILE_NAME)))
}

/// Builds the filter: `--log-level`, then `RUST_LOG`, then the default
fn build_filter(config: &StartupConfig) -> EnvFilter {
    match config.log_level.as_deref() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
    }
}

/// Installs the global tracing subscriber writing to the log file
///
/// Returns the path being written to.
pub fn init(config: &StartupConfig) -> Result<PathBuf, LoggingError> {
    let path = log_path(config).ok_or(LoggingError::NoLogPath)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    tracing::info!("fxconvert v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(path)
}
