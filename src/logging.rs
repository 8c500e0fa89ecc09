//! Logger setup
//!
//! Installs `env_logger` as the `log` backend. The configured level can be
//! refined at runtime through the `CHECKURWEATHER_LOG` variable, which takes
//! the usual `env_logger` filter syntax.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::Path;
use thiserror::Error;

/// Environment variable with logging filter directives
pub const LOG_ENV: &str = "CHECKURWEATHER_LOG";

/// Errors that can occur while installing the logger
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file could not be opened
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    /// A logger was already installed
    #[error("Failed to install logger: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Builds a logger writing to `log_file`, or to stderr when `None`
fn builder(level: LevelFilter, log_file: Option<&Path>) -> Result<Builder, LoggingError> {
    let mut builder = Builder::new();
    builder.filter_level(level).parse_env(LOG_ENV);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    Ok(builder)
}

/// Installs the global logger
///
/// # Arguments
/// * `level` - Default maximum level
/// * `log_file` - File to append to; stderr is used when `None`
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), LoggingError> {
    builder(level, log_file)?.try_init()?;
    Ok(())
}
