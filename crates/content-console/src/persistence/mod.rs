//! Key/value persistence port used by the layout store.
//!
//! The store only needs `get`/`set` of string values. Adapters:
//! - [`MemoryStore`]: in-process map, used by tests and previews.
//! - [`FileStore`]: a single JSON document on disk, written atomically.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by persistence adapters.
///
/// Callers in the layout engine log these and carry on; they never reach
/// the user as blocking failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error reading or writing the backing file.
    #[error("storage I/O failed for {path}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not valid JSON.
    #[error("storage document {path} is malformed: {message}")]
    Parse {
        /// File containing the malformed document.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The temp file was written but could not replace the original.
    #[error("failed to replace {path} atomically, safety copy at {temp_path}")]
    WriteAtomic {
        /// Destination path.
        path: PathBuf,
        /// Temp file left behind.
        temp_path: PathBuf,
    },

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Convenience alias for persistence results.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Synchronous string key/value storage.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Builds the storage key for a model's layout document.
pub fn layout_key(namespace: &str, model_key: &str) -> String {
    format!("{namespace}:{model_key}")
}
