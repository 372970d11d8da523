//! Reads `config.toml` into [`Config`].
//!
//! An explicit path must exist. The default XDG path is optional: when it is
//! missing every setting takes its default. Parse errors carry the 1-based
//! line and column so they can be reported like compiler diagnostics.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Entry points for loading configuration.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `explicit` (usually `--config`), or the default location.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => Self::load_default(),
        }
    }

    /// Loads a file that must exist.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
        Self::parse_toml(&content, path)
    }

    /// Loads `$XDG_CONFIG_HOME/content-console/config.toml` if present.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse_toml(&content, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
            Err(source) => Err(read_error(&path, source)),
        }
    }

    /// Parses `content`, attributing errors to `path`.
    pub(crate) fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map_or((0, 0), |span| line_column(content, span.start));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

fn read_error(path: &Path, source: std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    if source.kind() == ErrorKind::NotFound {
        ConfigError::NotFound { path }
    } else {
        ConfigError::ReadError { path, source }
    }
}

/// One-based line and column of byte `offset` in `content`.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (line, before.len() - line_start + 1)
}
