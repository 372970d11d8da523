//! Errors raised while reading, parsing or writing `config.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration failures, each carrying the file it concerns.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O failure other than a missing file.
    #[error("cannot read config {path}")]
    ReadError {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type mismatch.
    #[error("invalid config {path}:{line}:{column}: {message}")]
    ParseError {
        /// File being parsed.
        path: PathBuf,
        /// One-based line, 0 when the parser gave no span.
        line: usize,
        /// One-based column, 0 when the parser gave no span.
        column: usize,
        /// Parser message without position.
        message: String,
    },

    /// `--config` named a file that does not exist.
    #[error("config {path} not found")]
    NotFound {
        /// Requested file.
        path: PathBuf,
    },

    /// `config init` would clobber an existing file.
    #[error("config {path} already exists (pass --force to replace it)")]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the template or its backup failed.
    #[error("cannot write config {path}")]
    WriteError {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The loaded config could not be rendered back to TOML.
    #[error("cannot render config as TOML: {message}")]
    SerializeError {
        /// Serializer message.
        message: String,
    },
}
