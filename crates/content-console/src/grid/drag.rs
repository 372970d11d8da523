//! Drag-and-drop gesture tracking for the field grid.

use crate::layout::{LayoutCommand, LayoutEntry};

/// In-flight drag of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    source: Option<String>,
}

impl DragState {
    /// Starts dragging field `id`, replacing any earlier drag.
    pub fn begin(&mut self, id: &str) {
        self.source = Some(id.to_string());
    }

    /// Field currently being dragged.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Abandons the drag.
    pub fn cancel(&mut self) {
        self.source = None;
    }

    /// Ends the drag over `target` and computes the reorder intent.
    ///
    /// Returns `None` when nothing is being dragged, the drop lands outside
    /// any field, on the dragged field itself, or either id is not in
    /// `layout`. The drag ends in every case.
    pub fn drop_on(&mut self, target: Option<&str>, layout: &[LayoutEntry]) -> Option<LayoutCommand> {
        let source = self.source.take()?;
        let target = target?;
        if source == target {
            return None;
        }
        let from = layout.iter().position(|e| e.id == source)?;
        let to = layout.iter().position(|e| e.id == target)?;
        Some(LayoutCommand::Reorder { from, to })
    }
}
