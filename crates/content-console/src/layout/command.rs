use super::{FieldSize, LayoutEntry};

/// Layout mutation intents emitted by the grid and handled by
/// [`LayoutStore::apply`](super::LayoutStore::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutCommand {
    /// Move the entry at `from` to position `to`.
    Reorder {
        /// Current index of the moved entry.
        from: usize,
        /// Index the entry ends up at.
        to: usize,
    },
    /// Change one entry's size.
    Resize {
        /// Field key.
        id: String,
        /// New size.
        size: FieldSize,
    },
    /// Replace the whole layout; it is reconciled before being adopted.
    Replace(Vec<LayoutEntry>),
    /// Drop customizations and regenerate the default layout.
    Reset,
    /// Persist the current layout as final ("Done" in config mode).
    Commit,
}
