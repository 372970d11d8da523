//! Frame layout of the editor: grid on top, one status line below.

use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::grid::FieldGrid;
use crate::persistence::KeyValueStore;
use crate::tui::app::App;

/// Key hints in display order, paired with their priority (lower survives longer).
const VIEW_HINTS: [(&str, u8); 6] = [
    ("[j/k] Select", 4),
    ("[enter] Edit", 2),
    ("[c] Configure", 3),
    ("[R] Reload", 5),
    ("[w] Save", 1),
    ("[q] Quit", 0),
];

const HINT_GAP: &str = "  ";

/// Draws the whole editor frame.
pub fn render_editor<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>) {
    let [grid_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let grid = FieldGrid::new(&app.model, app.layout.entries(), &app.fields).values(&app.record);
    frame.render_stateful_widget(grid, grid_area, &mut app.grid);

    frame.render_widget(
        Paragraph::new(status_line(app, status_area.width)),
        status_area,
    );
}

/// Joins the hints that fit in `width` columns, dropping low-priority ones first.
fn fit_hints(width: u16) -> String {
    fn joined_width(hints: &[(&str, u8)]) -> usize {
        let text: usize = hints.iter().map(|(hint, _)| hint.chars().count()).sum();
        text + HINT_GAP.len() * hints.len().saturating_sub(1)
    }

    let mut kept: Vec<(&str, u8)> = VIEW_HINTS.to_vec();
    while kept.len() > 1 && joined_width(&kept) > usize::from(width) {
        if let Some(pos) = kept
            .iter()
            .enumerate()
            .max_by_key(|(_, (_, priority))| *priority)
            .map(|(pos, _)| pos)
        {
            kept.remove(pos);
        }
    }
    kept.iter()
        .map(|(hint, _)| *hint)
        .collect::<Vec<_>>()
        .join(HINT_GAP)
}

fn status_line<S>(app: &App<S>, width: u16) -> Line<'static> {
    if let Some(input) = &app.input {
        let label = app
            .fields
            .iter()
            .find(|f| f.key == input.key)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| input.key.clone());
        return Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
            Span::raw(input.buffer.clone()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]);
    }
    if let Some((message, _)) = &app.status_message {
        return Line::from(Span::styled(message.clone(), Style::default().fg(Color::Green)));
    }
    Line::from(Span::styled(fit_hints(width), Style::default().fg(Color::DarkGray)))
}
