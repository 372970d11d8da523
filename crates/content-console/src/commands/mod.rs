//! Command implementations for the `ccon` CLI.
//!
//! - `fields` - print mapped field descriptors
//! - `render` - print a model's grid as text
//! - `layout` - inspect and change a persisted layout
//! - `edit` - interactive editor
//! - `config` - configuration file management

pub(crate) mod config;
pub(crate) mod edit;
pub(crate) mod fields;
pub(crate) mod layout;
pub(crate) mod render;

pub(crate) use config::*;
pub(crate) use edit::*;
pub(crate) use fields::*;
pub(crate) use layout::*;
pub(crate) use render::*;

use content_console::config::Config;
use content_console::fetch::{load_record, load_schema};
use content_console::permissions::{Action, PermissionCheck};
use content_console::{FieldDescriptor, FileStore, LayoutStore};
use serde_json::{Map, Value};
use std::path::Path;

/// Loads and maps a schema file, reporting failures on stderr.
pub(crate) async fn fields_or_report(schema: &Path) -> Option<Vec<FieldDescriptor>> {
    match load_schema(schema).await {
        Ok(fields) => Some(fields),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

/// Loads an optional record file; `None` on failure (already reported).
pub(crate) async fn record_or_report(record: Option<&Path>) -> Option<Map<String, Value>> {
    let Some(path) = record else {
        return Some(Map::new());
    };
    match load_record(path).await {
        Ok(map) => Some(map),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

/// Opens the persisted layout of `model` against `fields`.
pub(crate) fn open_layout(
    config: &Config,
    model: &str,
    fields: &[FieldDescriptor],
) -> LayoutStore<FileStore> {
    let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
    LayoutStore::open(
        FileStore::new(config.layouts_path()),
        &config.storage.namespace,
        model,
        &keys,
    )
}

/// Checks `action` on `model` for the configured role, reporting denials.
pub(crate) fn require(config: &Config, model: &str, action: Action) -> bool {
    let permissions = config.role_permissions();
    if permissions.can(model, action) {
        return true;
    }
    eprintln!(
        "Error: role '{}' may not {} '{}'",
        permissions.role(),
        action,
        model
    );
    false
}
