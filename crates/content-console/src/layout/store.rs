//! Per-model layout store with reconcile-on-load and write-through persistence.
//!
//! The store owns the layout document for one model. Every load runs the
//! stored document through [`reconcile`] against the current field keys and
//! writes the result back when it changed, so stale or missing ids heal
//! themselves. Mutations never fail: invalid requests are no-ops reported by a
//! `false` return, and storage errors are logged and dropped because a layout
//! can always be regenerated from the fields.

use serde::Deserialize;

use super::{default_layout, reconcile, FieldSize, LayoutCommand, LayoutEntry};
use crate::persistence::{layout_key, KeyValueStore};

/// Persisted, reconciling layout for one model.
#[derive(Debug)]
pub struct LayoutStore<S> {
    storage: S,
    storage_key: String,
    field_keys: Vec<String>,
    entries: Vec<LayoutEntry>,
}

impl<S: KeyValueStore> LayoutStore<S> {
    /// Opens the layout for `model_key` and loads it against `field_keys`.
    pub fn open<K: AsRef<str>>(
        storage: S,
        namespace: &str,
        model_key: &str,
        field_keys: &[K],
    ) -> Self {
        let mut store = Self {
            storage,
            storage_key: layout_key(namespace, model_key),
            field_keys: field_keys.iter().map(|k| k.as_ref().to_string()).collect(),
            entries: Vec::new(),
        };
        store.load();
        store
    }

    /// Storage key of this model's document.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Current reconciled layout.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Field keys the layout is reconciled against.
    pub fn field_keys(&self) -> &[String] {
        &self.field_keys
    }

    /// Reads the stored document, reconciles it and heals storage if needed.
    ///
    /// Storage is rewritten whenever the canonical form of the reconciled
    /// layout differs from the stored JSON, so stale ids, malformed elements
    /// and non-canonical sizes such as `"wide"` are all normalized on disk.
    pub fn load(&mut self) -> &[LayoutEntry] {
        let stored = self.read_stored();
        let entries = stored.as_ref().map(parse_entries).unwrap_or_default();
        self.entries = reconcile(&entries, &self.field_keys);
        let canonical = serde_json::to_value(&self.entries).ok();
        if canonical.is_none() || canonical != stored {
            tracing::debug!(key = %self.storage_key, "healing stored layout");
            self.persist();
        }
        &self.entries
    }

    /// Replaces the authoritative field keys.
    ///
    /// Identical keys are a no-op; otherwise the current layout is reconciled
    /// against the new keys and persisted if it changed.
    pub fn set_fields<K: AsRef<str>>(&mut self, field_keys: &[K]) {
        let same = field_keys.len() == self.field_keys.len()
            && field_keys
                .iter()
                .zip(&self.field_keys)
                .all(|(a, b)| a.as_ref() == b);
        if same {
            return;
        }
        let was_empty = self.field_keys.is_empty();
        self.field_keys = field_keys.iter().map(|k| k.as_ref().to_string()).collect();
        if was_empty {
            // Nothing was persisted while the field set was empty, so the
            // stored document is still the authoritative customization.
            self.load();
            return;
        }
        let reconciled = reconcile(&self.entries, &self.field_keys);
        if reconciled != self.entries {
            self.entries = reconciled;
            self.persist();
        }
    }

    /// Updates the size of entry `id`. Returns `false` if `id` is unknown.
    pub fn set_size(&mut self, id: &str, size: FieldSize) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            tracing::debug!(id, "resize ignored, no such entry");
            return false;
        };
        entry.size = size;
        self.persist();
        true
    }

    /// Moves the entry at `from` to `to`.
    ///
    /// Out-of-range indices are rejected rather than clamped, and moving an
    /// entry onto itself changes nothing; both return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.entries.len();
        if from >= len || to >= len {
            tracing::debug!(from, to, len, "reorder ignored, index out of range");
            return false;
        }
        if from == to {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.persist();
        true
    }

    /// Adopts `new_layout` after reconciling it against the current fields.
    pub fn replace_all(&mut self, new_layout: &[LayoutEntry]) {
        self.entries = reconcile(new_layout, &self.field_keys);
        self.persist();
    }

    /// Regenerates one half entry per field, in field order.
    pub fn reset(&mut self) {
        self.entries = default_layout(&self.field_keys);
        self.persist();
    }

    /// Applies a grid intent. Returns whether the layout was written.
    pub fn apply(&mut self, command: LayoutCommand) -> bool {
        match command {
            LayoutCommand::Reorder { from, to } => self.reorder(from, to),
            LayoutCommand::Resize { id, size } => self.set_size(&id, size),
            LayoutCommand::Replace(layout) => {
                self.replace_all(&layout);
                true
            }
            LayoutCommand::Reset => {
                self.reset();
                true
            }
            LayoutCommand::Commit => {
                let current = self.entries.clone();
                self.replace_all(&current);
                true
            }
        }
    }

    /// Consumes the store and returns its storage handle.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn read_stored(&self) -> Option<serde_json::Value> {
        let raw = match self.storage.get(&self.storage_key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.storage_key, "layout read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(key = %self.storage_key, "discarding unparsable layout: {}", e);
                None
            }
        }
    }

    fn persist(&self) {
        // An empty field set is the transient state before a schema arrives;
        // writing it would erase the stored customization.
        if self.field_keys.is_empty() {
            return;
        }
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %self.storage_key, "layout serialization failed: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.storage_key, &json) {
            tracing::warn!(key = %self.storage_key, "layout write failed: {}", e);
        }
    }
}

/// Entries of a stored document; elements that are not valid entries are dropped.
fn parse_entries(document: &serde_json::Value) -> Vec<LayoutEntry> {
    let Some(elements) = document.as_array() else {
        tracing::warn!("stored layout is not an array, ignoring it");
        return Vec::new();
    };
    elements
        .iter()
        .filter_map(|element| match LayoutEntry::deserialize(element) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(%element, "dropping malformed layout entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
