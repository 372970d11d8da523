//! `ccon fields`: prints the mapped descriptors of a schema as JSON.

use std::path::Path;
use std::process::ExitCode;

use super::fields_or_report;

pub(crate) async fn run_fields_command(schema: &Path) -> ExitCode {
    let Some(fields) = fields_or_report(schema).await else {
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(&fields) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: failed to serialize fields: {e}");
            ExitCode::FAILURE
        }
    }
}
