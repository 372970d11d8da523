//! Asynchronous schema and record loading with stale-result suppression.
//!
//! A page may ask for a model's schema several times in quick succession
//! (model switch, manual reload). Responses can complete out of order, so
//! every request takes a [`RequestTicket`] from a [`RequestSequencer`] and its
//! result is applied only while that ticket is still the latest one issued.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::schema::{map_schema, FieldDescriptor};

/// Errors loading schema or record documents.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The document could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Requested document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("invalid JSON in {path}: {message}")]
    Parse {
        /// Requested document.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A record document is JSON but not an object.
    #[error("record {path} must be a JSON object")]
    NotAnObject {
        /// Requested document.
        path: PathBuf,
    },
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Issues tickets and tells whether a ticket is still the latest.
///
/// Cloning shares the counter, so spawned tasks can hold a handle.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    /// Creates a sequencer with no requests issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the most recently issued ticket.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Returns `value` if `ticket` is current, dropping it otherwise.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "discarding superseded result");
            None
        }
    }
}

/// Reads a JSON document from disk.
pub async fn load_json(path: &Path) -> Result<Value, FetchError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FetchError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&content).map_err(|e| FetchError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads a schema description and maps it to field descriptors.
pub async fn load_schema(path: &Path) -> Result<Vec<FieldDescriptor>, FetchError> {
    let raw = load_json(path).await?;
    let fields = map_schema(&raw);
    tracing::debug!(path = %path.display(), count = fields.len(), "schema loaded");
    Ok(fields)
}

/// Loads a record (field values) document.
pub async fn load_record(path: &Path) -> Result<serde_json::Map<String, Value>, FetchError> {
    match load_json(path).await? {
        Value::Object(map) => Ok(map),
        _ => Err(FetchError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
