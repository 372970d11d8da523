//! File-backed key/value store.
//!
//! All keys live in one JSON object on disk. Every `set` rewrites the whole
//! document with the temp-file-then-rename pattern:
//! 1. Write to `<file>.tmp.<timestamp>`
//! 2. Fsync the temp file
//! 3. Rename over the original
//!
//! If the rename fails the temp file is left in place as a safety copy.

use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, PersistenceError, Result};

/// Key/value store persisted as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| PersistenceError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<()> {
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| PersistenceError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let timestamp = Local::now().format("%Y%m%d-%H%M%S%3f").to_string();
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layouts.json".to_string());
        let temp_path = self
            .path
            .with_file_name(format!("{file_name}.tmp.{timestamp}"));

        fs::write(&temp_path, json).map_err(io_err)?;
        let file = fs::File::open(&temp_path).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&temp_path, &self.path).map_err(|_| PersistenceError::WriteAtomic {
            path: self.path.clone(),
            temp_path: temp_path.clone(),
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt document is replaced rather than blocking every write.
        let mut document = match self.read_document() {
            Ok(doc) => doc,
            Err(PersistenceError::Parse { path, message }) => {
                tracing::warn!("discarding malformed storage document {}: {}", path.display(), message);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }
}
