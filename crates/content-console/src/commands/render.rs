//! `ccon render`: draws a model's grid into an off-screen buffer and prints it.

use content_console::config::Config;
use content_console::grid::{FieldGrid, FieldGridState};
use content_console::permissions::{Action, PermissionCheck};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use std::path::Path;
use std::process::ExitCode;

use super::{fields_or_report, open_layout, record_or_report, require};

pub(crate) async fn run_render_command(
    config: &Config,
    schema: &Path,
    model: &str,
    record: Option<&Path>,
    width: u16,
    config_mode: bool,
) -> ExitCode {
    if !require(config, model, Action::Read) {
        return ExitCode::FAILURE;
    }
    let Some(fields) = fields_or_report(schema).await else {
        return ExitCode::FAILURE;
    };
    let Some(values) = record_or_report(record).await else {
        return ExitCode::FAILURE;
    };

    let layout = open_layout(config, model, &fields);
    let editable = config.role_permissions().can(model, Action::Update);
    let mut state = FieldGridState::new(editable);
    if config_mode && !state.enter_config() {
        eprintln!("Warning: layout of '{model}' is read-only for this role");
    }

    let mut grid = FieldGrid::new(model, layout.entries(), &fields);
    if record.is_some() {
        grid = grid.values(&values);
    }
    let area = Rect::new(0, 0, width.max(4), grid.required_height(state.mode()));
    let mut buffer = Buffer::empty(area);
    grid.render(area, &mut buffer, &mut state);

    for line in buffer_lines(&buffer) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

/// Rows of `buffer` as text with trailing blanks removed.
fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol()))
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}
