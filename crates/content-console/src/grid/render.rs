//! Ratatui rendering of the field grid.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, StatefulWidget, Widget},
};
use serde_json::{Map, Value};

use super::{plan_rows, CellSpan, FieldGridState, GridMode};
use crate::layout::{FieldSize, LayoutEntry};
use crate::schema::{FieldDescriptor, FieldType};

/// Terminal rows taken by one grid row (border, value, border).
pub const CELL_HEIGHT: u16 = 3;

/// Drag handle shown before labels in config mode.
const DRAG_HANDLE: &str = "⠿ ";

/// Shown for fields with neither a value nor a default.
const EMPTY_VALUE: &str = "<empty>";

/// Grid widget borrowing everything it draws.
#[derive(Debug, Clone, Copy)]
pub struct FieldGrid<'a> {
    model: &'a str,
    layout: &'a [LayoutEntry],
    fields: &'a [FieldDescriptor],
    values: Option<&'a Map<String, Value>>,
}

impl<'a> FieldGrid<'a> {
    /// Creates a grid for `model` from its reconciled layout and descriptors.
    pub fn new(model: &'a str, layout: &'a [LayoutEntry], fields: &'a [FieldDescriptor]) -> Self {
        Self {
            model,
            layout,
            fields,
            values: None,
        }
    }

    /// Attaches live record values.
    pub fn values(mut self, values: &'a Map<String, Value>) -> Self {
        self.values = Some(values);
        self
    }

    /// Terminal rows needed to draw every field plus header and footer.
    pub fn required_height(&self, mode: GridMode) -> u16 {
        let rows = u16::try_from(plan_rows(self.layout, self.fields).len()).unwrap_or(u16::MAX);
        let footer = u16::from(mode == GridMode::Config);
        rows.saturating_mul(CELL_HEIGHT)
            .saturating_add(1)
            .saturating_add(footer)
    }

    fn header_line(&self, state: &FieldGridState) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.model),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if state.mode() == GridMode::Config {
            spans.push(Span::styled(
                " configuring layout ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }
        if !state.editable() {
            spans.push(Span::styled(" read-only", Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    }

    fn footer_line() -> Line<'static> {
        Line::from(vec![
            Span::styled("[d] Done", Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled("[r] Reset", Style::default().fg(Color::Red)),
            Span::raw("  [s] Size  [space] Move  [esc] Cancel move"),
        ])
    }
}

impl StatefulWidget for FieldGrid<'_> {
    type State = FieldGridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.height == 0 || area.width == 0 {
            state.set_cell_rects(Vec::new());
            return;
        }

        Paragraph::new(self.header_line(state)).render(
            Rect {
                height: 1,
                ..area
            },
            buf,
        );

        let config = state.mode() == GridMode::Config;
        let mut body_bottom = area.y + area.height;
        if config && area.height > 1 {
            body_bottom -= 1;
            Paragraph::new(Self::footer_line()).render(
                Rect {
                    y: body_bottom,
                    height: 1,
                    ..area
                },
                buf,
            );
        }

        let half = area.width / 2;
        let mut rects = Vec::new();
        let mut y = area.y + 1;
        for row in plan_rows(self.layout, self.fields) {
            if y + CELL_HEIGHT > body_bottom {
                break;
            }
            for cell in row {
                let (x, width) = match cell.span {
                    CellSpan::Left => (area.x, half),
                    CellSpan::Right => (area.x + half, area.width - half),
                    CellSpan::Both => (area.x, area.width),
                };
                let rect = Rect::new(x, y, width, CELL_HEIGHT);
                let value = self.values.and_then(|v| v.get(&cell.field.key));
                render_cell(cell.field, cell.size, cell.index, value, rect, buf, state);
                rects.push((cell.index, rect));
            }
            y += CELL_HEIGHT;
        }
        state.set_cell_rects(rects);
    }
}

fn render_cell(
    field: &FieldDescriptor,
    size: FieldSize,
    index: usize,
    value: Option<&Value>,
    rect: Rect,
    buf: &mut Buffer,
    state: &FieldGridState,
) {
    let structure = state.structure_editable();
    let dragging = state.drag().source() == Some(field.key.as_str());
    let selected = state.selected == Some(index);

    let border_style = if dragging {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let mut title = Vec::new();
    if structure {
        title.push(Span::styled(DRAG_HANDLE, Style::default().fg(Color::DarkGray)));
    }
    title.push(Span::raw(field.label.clone()));
    if field.required {
        title.push(Span::styled("*", Style::default().fg(Color::Red)));
    }

    let mut block = Block::bordered()
        .border_style(border_style)
        .title(Line::from(title));
    if structure {
        let badge = if field.is_wide() && size == FieldSize::Half {
            "[wide]".to_string()
        } else {
            format!("[{size}]")
        };
        block = block.title_top(Line::from(badge).right_aligned());
    }

    let inner_width = rect.width.saturating_sub(2) as usize;
    let text = truncate(&format_value(field, value), inner_width);
    let value_style = if state.editable() {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(Span::styled(text, value_style))
        .block(block)
        .render(rect, buf);
}

/// Human-readable rendering of a field value.
///
/// Absent values fall back to the field default.
pub fn format_value(field: &FieldDescriptor, value: Option<&Value>) -> String {
    let value = match value {
        Some(Value::Null) | None => &field.default,
        Some(v) => v,
    };
    match (value, &field.field_type) {
        (Value::Null, _) => EMPTY_VALUE.to_string(),
        (Value::String(s), FieldType::Select { options }) => options
            .iter()
            .find(|o| &o.value == s)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| s.clone()),
        (Value::Bool(b), _) => (if *b { "yes" } else { "no" }).to_string(),
        (Value::Array(items), FieldType::Relation { .. }) => format!("{} linked", items.len()),
        (Value::Array(items), _) => format!("{} items", items.len()),
        (Value::Object(map), _) => format!("{{{} fields}}", map.len()),
        (Value::String(s), _) => s.clone(),
        (Value::Number(n), _) => n.to_string(),
    }
}

/// Truncates to `max` characters, ending with "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    }
}
