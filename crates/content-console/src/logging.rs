//! Logging initialization for `ccon`.
//!
//! Configures the `tracing` subscriber with level filtering via the `CCON_LOG`
//! environment variable. Falls back to the configured `[logging] log_level`
//! when the variable is unset or invalid.
//!
//! ```bash
//! # Debug level
//! CCON_LOG=debug ccon layout show --model blog schema.json
//!
//! # Module-specific filtering
//! CCON_LOG=content_console::layout=trace,warn ccon edit --model blog schema.json
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::{LogLevel, LoggingConfig};
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "CCON_LOG";

/// Errors setting up the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured log file could not be opened for appending.
    #[error("failed to open log file {path}")]
    OpenLogFile {
        /// Configured path after tilde expansion.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Builds the filter from `CCON_LOG`, falling back to `level`.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Initialize the tracing subscriber.
///
/// Output goes to the configured log file, or to stderr when none is set.
/// `interactive` callers own the terminal, so without a log file their
/// output is discarded. Calling this more than once keeps the first
/// subscriber.
pub fn init(config: &LoggingConfig, interactive: bool) -> Result<(), LoggingError> {
    let filter = env_filter(config.log_level);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = if !config.log_file.is_empty() {
        let path = xdg::expand_tilde(&config.log_file);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggingError::OpenLogFile {
                path: path.clone(),
                source: e,
            })?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else if interactive {
        builder.with_writer(std::io::sink).try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
