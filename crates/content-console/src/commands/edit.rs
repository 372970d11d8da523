//! `ccon edit`: interactive editor for one model.

use content_console::config::Config;
use content_console::permissions::{Action, PermissionCheck};
use content_console::tui::App;
use std::path::Path;
use std::process::ExitCode;

use super::{fields_or_report, open_layout, record_or_report, require};

pub(crate) async fn run_edit_command(
    config: &Config,
    schema: &Path,
    model: &str,
    record: Option<&Path>,
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
    let mut app = App::new(model, schema.to_path_buf(), fields, layout, editable)
        .with_record(record.map(Path::to_path_buf), values)
        .with_tick_rate(config.console.tick_rate());

    if let Err(e) = app.run().await {
        eprintln!("Editor error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
