//! Pure merge of a persisted layout with the current field set.

use indexmap::IndexMap;
use std::collections::HashSet;

use super::{FieldSize, LayoutEntry};

/// Aligns `existing` with `field_keys`.
///
/// Retained entries keep their relative order and size; keys with no entry
/// are appended as half-width in field order; entries for keys no longer in
/// `field_keys` are dropped. The first entry wins when an id appears twice;
/// size normalization already happened when the entries were deserialized.
pub fn reconcile<K: AsRef<str>>(existing: &[LayoutEntry], field_keys: &[K]) -> Vec<LayoutEntry> {
    let mut merged: IndexMap<&str, FieldSize> = IndexMap::with_capacity(existing.len());
    for entry in existing {
        merged.entry(entry.id.as_str()).or_insert(entry.size);
    }

    for key in field_keys {
        merged.entry(key.as_ref()).or_insert(FieldSize::Half);
    }

    let current: HashSet<&str> = field_keys.iter().map(|k| k.as_ref()).collect();
    merged
        .into_iter()
        .filter(|(id, _)| current.contains(id))
        .map(|(id, size)| LayoutEntry {
            id: id.to_string(),
            size,
        })
        .collect()
}
