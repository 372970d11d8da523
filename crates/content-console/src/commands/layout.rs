//! `ccon layout`: inspects and changes a model's persisted layout.

use content_console::config::Config;
use content_console::permissions::Action;
use content_console::{FieldSize, FileStore, LayoutCommand, LayoutEntry, LayoutStore};
use std::process::ExitCode;

use super::{fields_or_report, open_layout, require};
use crate::LayoutAction;

pub(crate) async fn run_layout_command(config: &Config, action: LayoutAction) -> ExitCode {
    let target = action.target();
    let needed = match action {
        LayoutAction::Show { .. } => Action::Read,
        _ => Action::Update,
    };
    if !require(config, &target.model, needed) {
        return ExitCode::FAILURE;
    }
    let Some(fields) = fields_or_report(&target.schema).await else {
        return ExitCode::FAILURE;
    };
    let mut store = open_layout(config, &target.model, &fields);

    let result = match &action {
        LayoutAction::Show { .. } => Ok(()),
        LayoutAction::Reset { .. } => {
            store.apply(LayoutCommand::Reset);
            Ok(())
        }
        LayoutAction::Resize { id, size, .. } => resize(&mut store, id, *size),
        LayoutAction::Move { from, to, .. } => move_entry(&mut store, *from, *to),
    };
    if let Err(message) = result {
        eprintln!("Error: {message}");
        return ExitCode::FAILURE;
    }

    print!("{}", format_layout(store.entries()));
    ExitCode::SUCCESS
}

fn resize(store: &mut LayoutStore<FileStore>, id: &str, size: FieldSize) -> Result<(), String> {
    let command = LayoutCommand::Resize {
        id: id.to_string(),
        size,
    };
    if store.apply(command) {
        Ok(())
    } else {
        Err(format!("no field '{id}' in layout"))
    }
}

fn move_entry(store: &mut LayoutStore<FileStore>, from: usize, to: usize) -> Result<(), String> {
    let len = store.entries().len();
    if from >= len || to >= len {
        return Err(format!(
            "position out of range (layout has {len} entries, positions start at 0)"
        ));
    }
    store.apply(LayoutCommand::Reorder { from, to });
    Ok(())
}

/// One line per entry: position, id and size.
fn format_layout(entries: &[LayoutEntry]) -> String {
    let width = entries.iter().map(|e| e.id.chars().count()).max().unwrap_or(0);
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{i:>3}  {:<width$}  {}\n", e.id, e.size))
        .collect()
}
