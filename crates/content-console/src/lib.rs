//! Content Console form engine library
//!
//! This crate turns a backend schema description into a typed field list,
//! keeps a per-model form layout persisted in a key/value store, reconciles
//! that layout whenever the field set changes, and renders it as an editable
//! two-column grid gated by a permission check.
//!
//! Data flow:
//!
//! ```text
//! raw schema ─ map_schema ─> FieldDescriptor list ─ LayoutStore::set_fields ─>
//! reconciled layout ─ FieldGrid ─> LayoutCommand ─ LayoutStore::apply ─> persisted
//! ```

/// Schema description mapping to typed field descriptors.
pub mod schema;

/// Per-model layout entries, reconciliation and the persisted store.
pub mod layout;

/// Key/value persistence port with in-memory and file-backed stores.
pub mod persistence;

/// Permission checks gating editing.
pub mod permissions;

/// Async schema/record loading and stale-result suppression.
pub mod fetch;

/// Two-column field grid rendered with ratatui.
pub mod grid;

/// Configuration loading, defaults and XDG paths.
pub mod config;

/// Tracing subscriber setup.
pub mod logging;

/// Interactive terminal editor.
pub mod tui;

#[cfg(test)]
mod test_utils;

pub use grid::{FieldGrid, FieldGridState, GridMode};
pub use layout::{FieldSize, LayoutCommand, LayoutEntry, LayoutStore};
pub use permissions::{Action, PermissionCheck};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use schema::{map_schema, FieldDescriptor, FieldType};
