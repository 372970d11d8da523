//! Shared test utilities: ratatui TestBackend helpers and schema fixtures.

#![cfg(test)]

use crate::grid::{FieldGrid, FieldGridState};
use crate::layout::LayoutEntry;
use crate::schema::{map_schema, FieldDescriptor};
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};
use serde_json::{json, Map, Value};

/// Off-screen terminal of `width` x `height` cells.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Symbols of one buffer row joined into a string.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Whether row `row` contains `text`.
pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Index of the first row containing `text`.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    (0..buffer.area().height).find(|&row| row_contains(buffer, row, text))
}

/// Whether any row contains `text`.
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    find_row_with_text(buffer, text).is_some()
}

/// Panics unless the cell at (`col`, `row`) is drawn in `color`.
pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

/// Raw schema description of a blog post model.
pub fn blog_schema() -> Value {
    json!({
        "_id": {"instance": "ObjectId"},
        "title": {"instance": "String", "required": true},
        "body": {"instance": "String", "fullWidth": true},
        "status": {"instance": "String", "enumValues": ["draft", "published"], "defaultValue": "draft"},
        "views": {"instance": "Number"},
        "heroSlide": {"instance": "Embedded", "schema": {"image": {}}},
        "owner": {"instance": "ObjectId"},
        "__v": {"instance": "Number"}
    })
}

/// Mapped descriptors of [`blog_schema`].
pub fn blog_fields() -> Vec<FieldDescriptor> {
    map_schema(&blog_schema())
}

/// A blog record with values for some fields.
pub fn blog_record() -> Map<String, Value> {
    match json!({
        "title": "Hello world",
        "body": "First post",
        "status": "published",
        "views": 42
    }) {
        Value::Object(map) => map,
        _ => unreachable!("literal is an object"),
    }
}

/// Renders a grid to a buffer and returns it for inspection.
pub fn render_grid_to_buffer(
    layout: &[LayoutEntry],
    fields: &[FieldDescriptor],
    values: Option<&Map<String, Value>>,
    state: &mut FieldGridState,
    width: u16,
    height: u16,
) -> Buffer {
    let mut terminal = test_terminal(width, height);
    terminal
        .draw(|frame| {
            let mut grid = FieldGrid::new("blog", layout, fields);
            if let Some(values) = values {
                grid = grid.values(values);
            }
            frame.render_stateful_widget(grid, frame.area(), state);
        })
        .expect("draw failed");
    terminal.backend().buffer().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_text_reads_rendered_paragraph() {
        let mut terminal = test_terminal(20, 5);
        terminal
            .draw(|frame| {
                let para = ratatui::widgets::Paragraph::new("Hello World");
                frame.render_widget(para, frame.area());
            })
            .expect("draw failed");
        let buffer = terminal.backend().buffer();
        assert!(row_text(buffer, 0).contains("Hello World"));
        assert_eq!(row_text(buffer, 9), "");
    }

    #[test]
    fn test_blog_fixture_maps_all_user_fields() {
        let keys: Vec<String> = blog_fields().into_iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec!["title", "body", "status", "views", "heroSlide", "owner"]
        );
    }
}
