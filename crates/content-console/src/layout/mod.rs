//! Per-model field layout: entries, reconciliation, and the persisted store.
//!
//! A layout is the ordered list of field ids with a display size each. The
//! [`reconcile`] function aligns a stored layout with the current field set;
//! [`LayoutStore`] owns one model's layout and writes every change through to
//! a [`KeyValueStore`](crate::persistence::KeyValueStore).

mod command;
mod entry;
mod reconcile;
mod store;

pub use command::LayoutCommand;
pub use entry::{default_layout, FieldSize, LayoutEntry};
pub use reconcile::reconcile;
pub use store::LayoutStore;
