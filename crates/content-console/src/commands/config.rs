//! `ccon config`: configuration file management.

use content_console::config::{default, xdg, ConfigError, ConfigLoader};
use std::path::Path;
use std::process::ExitCode;

use crate::ConfigAction;

pub(crate) fn run_config_command(action: ConfigAction, explicit: Option<&Path>) -> ExitCode {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(xdg::config_path);

    let result = match action {
        ConfigAction::Init { force } => default::write_default_config(&path, force)
            .map(|()| println!("Created configuration at {}", path.display())),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Validate => validate(explicit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate(explicit: Option<&Path>) -> Result<(), ConfigError> {
    let config = ConfigLoader::load(explicit)?;
    let rendered = toml::to_string_pretty(&config).map_err(|e| ConfigError::SerializeError {
        message: e.to_string(),
    })?;
    println!("Configuration is valid");
    println!("{rendered}");
    Ok(())
}
