use super::*;
use crate::persistence::{MemoryStore, PersistenceError};
use std::sync::Arc;

const NS: &str = "layout";

fn stored(storage: &MemoryStore, model: &str) -> Option<Vec<LayoutEntry>> {
    storage
        .get(&layout_key(NS, model))
        .expect("memory get")
        .map(|raw| serde_json::from_str(&raw).expect("stored layout parses"))
}

fn ids(entries: &[LayoutEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

/// Storage whose every operation fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> crate::persistence::Result<Option<String>> {
        Err(PersistenceError::Poisoned)
    }

    fn set(&self, _key: &str, _value: &str) -> crate::persistence::Result<()> {
        Err(PersistenceError::Poisoned)
    }
}

// -- load ---------------------------------------------------------------

#[test]
fn first_load_synthesizes_and_persists_default_layout() {
    let storage = MemoryStore::new();
    let store = LayoutStore::open(&storage, NS, "blog", &["title", "body"]);
    assert_eq!(
        store.entries(),
        &[LayoutEntry::half("title"), LayoutEntry::half("body")]
    );
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn load_heals_stale_document() {
    let storage = MemoryStore::with_entries([(
        "layout:blog",
        r#"[{"id":"gone","size":"full"},{"id":"body","size":"full"},{"id":"title"}]"#,
    )]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title", "body", "image"]);
    assert_eq!(
        store.entries(),
        &[
            LayoutEntry::full("body"),
            LayoutEntry::half("title"),
            LayoutEntry::half("image"),
        ]
    );
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn load_leaves_matching_document_untouched() {
    let raw = r#"[{"id":"body","size":"full"},{"id":"title","size":"half"}]"#;
    let storage = MemoryStore::with_entries([("layout:blog", raw)]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title", "body"]);
    assert_eq!(ids(store.entries()), vec!["body", "title"]);
    // Byte-identical: no rewrite happened.
    assert_eq!(
        storage.get("layout:blog").expect("get").as_deref(),
        Some(raw)
    );
}

#[test]
fn unparsable_document_is_treated_as_empty() {
    let storage = MemoryStore::with_entries([("layout:blog", "not json")]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title"]);
    assert_eq!(store.entries(), &[LayoutEntry::half("title")]);
    assert_eq!(stored(&storage, "blog"), Some(vec![LayoutEntry::half("title")]));
}

#[test]
fn malformed_entry_is_dropped_and_the_rest_kept() {
    let storage = MemoryStore::with_entries([(
        "layout:blog",
        r#"[{"id":"body","size":"full"},{"id":"title","size":"full"},{"size":"full"},{"id":7}]"#,
    )]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title", "body"]);
    assert_eq!(
        store.entries(),
        &[LayoutEntry::full("body"), LayoutEntry::full("title")]
    );
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn non_array_document_is_treated_as_empty() {
    let storage = MemoryStore::with_entries([("layout:blog", r#"{"id":"title"}"#)]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title"]);
    assert_eq!(store.entries(), &[LayoutEntry::half("title")]);
}

#[test]
fn load_rewrites_non_canonical_sizes() {
    let storage = MemoryStore::with_entries([(
        "layout:blog",
        r#"[{"id":"title","size":"wide"},{"id":"body"}]"#,
    )]);
    let store = LayoutStore::open(&storage, NS, "blog", &["title", "body"]);
    assert_eq!(
        store.entries(),
        &[LayoutEntry::half("title"), LayoutEntry::half("body")]
    );
    assert_eq!(
        storage.get("layout:blog").expect("get").as_deref(),
        Some(r#"[{"id":"title","size":"half"},{"id":"body","size":"half"}]"#)
    );
}

#[test]
fn broken_storage_never_panics() {
    let mut store = LayoutStore::open(BrokenStore, NS, "blog", &["a", "b"]);
    assert_eq!(ids(store.entries()), vec!["a", "b"]);
    assert!(store.set_size("a", FieldSize::Full));
    assert!(store.reorder(0, 1));
    store.reset();
    assert_eq!(ids(store.entries()), vec!["a", "b"]);
}

#[test]
fn namespaces_and_models_are_isolated() {
    let storage = MemoryStore::new();
    let mut blog = LayoutStore::open(&storage, NS, "blog", &["a", "b"]);
    blog.reorder(0, 1);
    let role = LayoutStore::open(&storage, NS, "role", &["a", "b"]);
    let other_ns = LayoutStore::open(&storage, "preview", "blog", &["a", "b"]);
    assert_eq!(ids(role.entries()), vec!["a", "b"]);
    assert_eq!(ids(other_ns.entries()), vec!["a", "b"]);
    assert_eq!(ids(blog.entries()), vec!["b", "a"]);
}

// -- set_size -------------------------------------------------------------

#[test]
fn set_size_updates_in_place_and_persists() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["title", "body"]);
    assert!(store.set_size("body", FieldSize::Full));
    assert_eq!(
        store.entries(),
        &[LayoutEntry::half("title"), LayoutEntry::full("body")]
    );
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn set_size_unknown_id_is_noop() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["title"]);
    assert!(!store.set_size("nope", FieldSize::Full));
    assert_eq!(store.entries(), &[LayoutEntry::half("title")]);
}

// -- reorder --------------------------------------------------------------

#[test]
fn reorder_moves_rather_than_swaps() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b", "c", "d"]);
    assert!(store.reorder(0, 2));
    assert_eq!(ids(store.entries()), vec!["b", "c", "a", "d"]);
    assert!(store.reorder(3, 0));
    assert_eq!(ids(store.entries()), vec!["d", "b", "c", "a"]);
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn reorder_out_of_range_is_rejected() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b", "c"]);
    assert!(!store.reorder(0, 5));
    assert!(!store.reorder(3, 0));
    assert!(!store.reorder(usize::MAX, 1));
    assert_eq!(ids(store.entries()), vec!["a", "b", "c"]);
}

#[test]
fn reorder_onto_itself_is_noop() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b"]);
    assert!(!store.reorder(1, 1));
    assert_eq!(ids(store.entries()), vec!["a", "b"]);
}

// -- replace_all / reset --------------------------------------------------

#[test]
fn replace_all_reconciles_input() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b", "c"]);
    store.replace_all(&[LayoutEntry::full("c"), LayoutEntry::half("ghost")]);
    assert_eq!(
        store.entries(),
        &[
            LayoutEntry::full("c"),
            LayoutEntry::half("a"),
            LayoutEntry::half("b"),
        ]
    );
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
}

#[test]
fn reset_regenerates_default_regardless_of_prior_state() {
    let storage = MemoryStore::with_entries([(
        "layout:blog",
        r#"[{"id":"image","size":"full"},{"id":"title","size":"full"},{"id":"body"}]"#,
    )]);
    let mut store = LayoutStore::open(&storage, NS, "blog", &["title", "body", "image"]);
    store.reset();
    let expected = vec![
        LayoutEntry::half("title"),
        LayoutEntry::half("body"),
        LayoutEntry::half("image"),
    ];
    assert_eq!(store.entries(), expected.as_slice());
    assert_eq!(stored(&storage, "blog"), Some(expected));
}

// -- set_fields -----------------------------------------------------------

#[test]
fn set_fields_appends_and_drops() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b"]);
    store.reorder(1, 0);
    store.set_fields(&["a", "c", "b"]);
    assert_eq!(ids(store.entries()), vec!["b", "a", "c"]);
    store.set_fields(&["c"]);
    assert_eq!(ids(store.entries()), vec!["c"]);
    assert_eq!(stored(&storage, "blog"), Some(vec![LayoutEntry::half("c")]));
}

#[test]
fn set_fields_is_idempotent() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b"]);
    store.set_fields(&["b", "a"]);
    let once = store.entries().to_vec();
    store.set_fields(&["b", "a"]);
    store.set_fields(&["b", "a"]);
    assert_eq!(store.entries(), once.as_slice());
}

#[test]
fn empty_fields_yield_empty_layout_without_erasing_storage() {
    let raw = r#"[{"id":"body","size":"full"},{"id":"title","size":"half"}]"#;
    let storage = MemoryStore::with_entries([("layout:blog", raw)]);
    let mut store = LayoutStore::open::<&str>(&storage, NS, "blog", &[]);
    assert!(store.entries().is_empty());
    assert_eq!(storage.get("layout:blog").expect("get").as_deref(), Some(raw));

    store.set_fields(&["title", "body"]);
    assert_eq!(
        store.entries(),
        &[LayoutEntry::full("body"), LayoutEntry::half("title")]
    );
}

// -- apply ----------------------------------------------------------------

#[test]
fn apply_dispatches_commands() {
    let storage = MemoryStore::new();
    let mut store = LayoutStore::open(&storage, NS, "blog", &["a", "b", "c"]);
    assert!(store.apply(LayoutCommand::Reorder { from: 2, to: 0 }));
    assert!(store.apply(LayoutCommand::Resize {
        id: "a".into(),
        size: FieldSize::Full
    }));
    assert_eq!(
        store.entries(),
        &[
            LayoutEntry::half("c"),
            LayoutEntry::full("a"),
            LayoutEntry::half("b"),
        ]
    );
    assert!(!store.apply(LayoutCommand::Reorder { from: 0, to: 9 }));
    assert!(store.apply(LayoutCommand::Commit));
    assert_eq!(stored(&storage, "blog"), Some(store.entries().to_vec()));
    assert!(store.apply(LayoutCommand::Reset));
    assert_eq!(ids(store.entries()), vec!["a", "b", "c"]);
}

#[test]
fn shared_storage_last_writer_wins() {
    let storage = Arc::new(MemoryStore::new());
    let mut first = LayoutStore::open(Arc::clone(&storage), NS, "blog", &["a", "b"]);
    let mut second = LayoutStore::open(Arc::clone(&storage), NS, "blog", &["a", "b"]);
    first.reorder(0, 1);
    second.set_size("a", FieldSize::Full);
    let reopened = LayoutStore::open(Arc::clone(&storage), NS, "blog", &["a", "b"]);
    assert_eq!(
        reopened.entries(),
        &[LayoutEntry::full("a"), LayoutEntry::half("b")]
    );
}
