//! Where content-console keeps its files.
//!
//! Both roots honour the XDG variables on every platform and otherwise fall
//! back to the platform convention:
//!
//! | Root   | Override          | Linux            | macOS                           |
//! |--------|-------------------|------------------|---------------------------------|
//! | config | `XDG_CONFIG_HOME` | `~/.config`      | `~/Library/Application Support` |
//! | data   | `XDG_DATA_HOME`   | `~/.local/share` | `~/Library/Application Support` |
//!
//! `config.toml` lives under the config root, `layouts.json` under the data
//! root, each inside a `content-console` directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the config and data roots.
pub const APP_NAME: &str = "content-console";

/// File holding every persisted layout document.
pub const LAYOUTS_FILE: &str = "layouts.json";

const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Copy)]
enum Root {
    Config,
    Data,
}

impl Root {
    fn env_var(self) -> &'static str {
        match self {
            Root::Config => "XDG_CONFIG_HOME",
            Root::Data => "XDG_DATA_HOME",
        }
    }

    #[cfg(target_os = "macos")]
    fn platform_default(self) -> PathBuf {
        let native = match self {
            Root::Config => dirs::config_dir(),
            Root::Data => dirs::data_dir(),
        };
        native.unwrap_or_else(|| home_dir().join("Library/Application Support"))
    }

    #[cfg(not(target_os = "macos"))]
    fn platform_default(self) -> PathBuf {
        match self {
            Root::Config => home_dir().join(".config"),
            Root::Data => home_dir().join(".local/share"),
        }
    }

    /// `<root>/content-console`, with an empty override treated as unset.
    fn app_dir(self) -> PathBuf {
        let base = std::env::var_os(self.env_var())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.platform_default());
        base.join(APP_NAME)
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    Root::Config.app_dir()
}

/// Default configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Directory holding persisted layouts.
pub fn data_dir() -> PathBuf {
    Root::Data.app_dir()
}

/// Default layouts document.
pub fn layouts_path() -> PathBuf {
    data_dir().join(LAYOUTS_FILE)
}

/// Resolves `~` and `~/...` against the home directory; other paths pass through.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home_dir(),
        Some(rest) if rest.starts_with('/') => home_dir().join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

/// Creates `path` (and parents) readable only by the owner.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
