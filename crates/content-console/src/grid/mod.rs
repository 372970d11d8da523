//! Two-column form grid driven by a reconciled layout.
//!
//! The grid joins layout entries with field descriptors, lays them out in
//! rows of two half-width cells (or one full-width cell), and renders them
//! with ratatui. It never mutates a layout: gestures produce
//! [`LayoutCommand`]s which the caller hands to the
//! [`LayoutStore`](crate::layout::LayoutStore).
//!
//! Structural editing (drag, resize, done, reset) is only available in
//! [`GridMode::Config`] and only when the grid is editable, which callers
//! derive from `can(model, Update)`.

mod drag;
mod render;

pub use drag::DragState;
pub use render::{format_value, FieldGrid, CELL_HEIGHT};

use std::collections::HashMap;

use ratatui::layout::Rect;

use crate::layout::{FieldSize, LayoutCommand, LayoutEntry};
use crate::schema::FieldDescriptor;

/// Whether the grid shows structure controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridMode {
    /// Values only; structure is fixed.
    #[default]
    View,
    /// Drag handles, size badges, Done and Reset.
    Config,
}

/// Horizontal placement of a cell within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSpan {
    /// Left column.
    Left,
    /// Right column.
    Right,
    /// Both columns.
    Both,
}

/// One field placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell<'a> {
    /// Index of the entry in the layout.
    pub index: usize,
    /// Persisted size of the entry.
    pub size: FieldSize,
    /// Descriptor joined by key.
    pub field: &'a FieldDescriptor,
    /// Columns the cell occupies.
    pub span: CellSpan,
}

/// Cells sharing one visual row.
pub type GridRow<'a> = Vec<GridCell<'a>>;

/// Packs layout entries into rows.
///
/// Half entries fill the next free column. Full entries and wide fields
/// (grouping types or explicit full-width) take a row of their own, closing a
/// half-filled row first. Entries whose id has no descriptor are skipped.
pub fn plan_rows<'a>(layout: &[LayoutEntry], fields: &'a [FieldDescriptor]) -> Vec<GridRow<'a>> {
    let mut rows = Vec::new();
    let mut pending: Option<GridCell<'a>> = None;
    let mut by_key: HashMap<&str, &'a FieldDescriptor> = HashMap::with_capacity(fields.len());
    for field in fields {
        by_key.entry(field.key.as_str()).or_insert(field);
    }

    for (index, entry) in layout.iter().enumerate() {
        let Some(&field) = by_key.get(entry.id.as_str()) else {
            tracing::trace!(id = %entry.id, "skipping stale layout entry");
            continue;
        };
        let spans_both = entry.size == FieldSize::Full || field.is_wide();
        let cell = |span| GridCell {
            index,
            size: entry.size,
            field,
            span,
        };

        if spans_both {
            if let Some(left) = pending.take() {
                rows.push(vec![left]);
            }
            rows.push(vec![cell(CellSpan::Both)]);
        } else if let Some(left) = pending.take() {
            rows.push(vec![left, cell(CellSpan::Right)]);
        } else {
            pending = Some(cell(CellSpan::Left));
        }
    }
    if let Some(left) = pending {
        rows.push(vec![left]);
    }
    rows
}

/// Interaction state of a grid between frames.
#[derive(Debug, Clone, Default)]
pub struct FieldGridState {
    mode: GridMode,
    editable: bool,
    /// Selected layout index.
    pub selected: Option<usize>,
    drag: DragState,
    /// Rects of the cells drawn in the last frame, by layout index.
    cell_rects: Vec<(usize, Rect)>,
}

impl FieldGridState {
    /// Creates view-mode state. `editable` comes from the update permission.
    pub fn new(editable: bool) -> Self {
        Self {
            editable,
            ..Self::default()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> GridMode {
        self.mode
    }

    /// Whether the user may edit this model.
    pub fn editable(&self) -> bool {
        self.editable
    }

    /// Whether structure gestures are accepted right now.
    pub fn structure_editable(&self) -> bool {
        self.editable && self.mode == GridMode::Config
    }

    /// Enters config mode. Returns `false` for read-only grids.
    pub fn enter_config(&mut self) -> bool {
        if !self.editable {
            return false;
        }
        self.mode = GridMode::Config;
        true
    }

    /// Leaves config mode, dropping any in-flight drag.
    pub fn exit_config(&mut self) {
        self.mode = GridMode::View;
        self.drag.cancel();
    }

    /// In-flight drag.
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Starts dragging `id`. Ignored unless structure is editable.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        if !self.structure_editable() {
            return false;
        }
        self.drag.begin(id);
        true
    }

    /// Drops the dragged field on `target`.
    pub fn drop_on(&mut self, target: Option<&str>, layout: &[LayoutEntry]) -> Option<LayoutCommand> {
        if !self.structure_editable() {
            self.drag.cancel();
            return None;
        }
        let command = self.drag.drop_on(target, layout)?;
        if let LayoutCommand::Reorder { to, .. } = command {
            self.selected = Some(to);
        }
        Some(command)
    }

    /// Abandons the drag.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Resize intent flipping the selected entry between half and full.
    pub fn toggle_selected_size(&self, layout: &[LayoutEntry]) -> Option<LayoutCommand> {
        if !self.structure_editable() {
            return None;
        }
        let entry = layout.get(self.selected?)?;
        Some(LayoutCommand::Resize {
            id: entry.id.clone(),
            size: entry.size.toggled(),
        })
    }

    /// "Done": commit the layout and return to view mode.
    pub fn done(&mut self) -> Option<LayoutCommand> {
        if !self.structure_editable() {
            return None;
        }
        self.exit_config();
        Some(LayoutCommand::Commit)
    }

    /// "Reset": regenerate the default layout.
    pub fn reset(&mut self) -> Option<LayoutCommand> {
        if !self.structure_editable() {
            return None;
        }
        self.drag.cancel();
        self.selected = None;
        Some(LayoutCommand::Reset)
    }

    /// Moves the selection forward, clamped to the last of `len` entries.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        let last = len - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    /// Moves the selection back, clamped to index 0.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Layout index of the cell drawn at terminal position (`x`, `y`).
    pub fn index_at(&self, x: u16, y: u16) -> Option<usize> {
        self.cell_rects
            .iter()
            .find(|(_, r)| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
            .map(|(index, _)| *index)
    }

    pub(crate) fn set_cell_rects(&mut self, rects: Vec<(usize, Rect)>) {
        self.cell_rects = rects;
    }
}
