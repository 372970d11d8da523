//! The commented `config.toml` written by `ccon config init`.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::xdg;

/// Commented template whose values equal `Config::default()`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Content Console Configuration
#
# All values shown below are the built-in defaults.
# Location: $XDG_CONFIG_HOME/content-console/config.toml

# ==============================================================================
# Layout storage
# ==============================================================================

[storage]

# Prefix of every persisted layout key ("<namespace>:<model>").
# Change it to keep several independent sets of layouts in one file.
namespace = "content-console"

# Path of the layouts document. Empty string means
# $XDG_DATA_HOME/content-console/layouts.json.
# Tilde (~) is expanded to the user's home directory.
path = ""

# ==============================================================================
# Editor
# ==============================================================================

[console]

# Role whose permissions apply, looked up in [permissions.roles].
role = "admin"

# Redraw interval of the interactive editor.
# Examples: "250ms", "500ms", "1s"
tick_rate = "250ms"

# ==============================================================================
# Permissions
# ==============================================================================
#
# Each role maps a model key (or "*" for every model) to allowed actions.
# Actions: "create", "read", "update", "delete".
# Layout and value editing require "update".

[permissions.roles.admin]
"*" = ["create", "read", "update", "delete"]

[permissions.roles.viewer]
"*" = ["read"]

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Verbosity when CCON_LOG is not set.
# Options: "error", "warn", "info", "debug", "trace"
log_level = "warn"

# Path to log file. Empty string means log to stderr.
log_file = ""
"#;

/// Writes [`DEFAULT_CONFIG_TEMPLATE`] to `path`, owner read/write only.
///
/// An existing file is an error unless `force` is set, in which case it is
/// renamed to `<name>.toml.backup` first.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| ConfigError::WriteError { path, source }
    };

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let backup = path.with_extension("toml.backup");
        fs::rename(path, &backup).map_err(write_err(&backup))?;
        tracing::info!(backup = %backup.display(), "kept previous config");
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        xdg::ensure_dir(dir).map_err(write_err(path))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err(path))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_err(path))?;
    }

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Config, LogLevel};

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.logging.log_level, LogLevel::Warn);
        assert!(parsed.permissions.roles.contains_key("viewer"));
    }

    #[test]
    fn writes_template_into_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ccon/config.toml");
        write_default_config(&path, false).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG_TEMPLATE);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).expect("metadata").permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn existing_file_is_kept_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[console]\nrole = \"viewer\"\n").expect("seed");
        let err = write_default_config(&path, false).expect_err("refused");
        assert!(matches!(err, ConfigError::AlreadyExists { .. }));
        assert!(fs::read_to_string(&path).expect("read").contains("viewer"));
        assert!(!dir.path().join("config.toml.backup").exists());
    }

    #[test]
    fn force_moves_existing_file_aside() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[console]\nrole = \"editor\"\n").expect("seed");
        write_default_config(&path, true).expect("forced write");
        let backup = fs::read_to_string(dir.path().join("config.toml.backup")).expect("backup");
        assert!(backup.contains("editor"));
        assert_eq!(fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG_TEMPLATE);
    }
}
