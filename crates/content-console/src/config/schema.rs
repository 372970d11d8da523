//! TOML configuration schema types for the content console.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial (or empty) file is always valid.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`, `"1s"`)
//! parsed by the `humantime` crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::xdg;
use crate::permissions::{Action, RolePermissions, RoleTable, ANY_MODEL};

/// Tick rate used when the configured value does not parse.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Everything `config.toml` can set.
///
/// ```toml
/// [storage]
/// [console]
/// [permissions.roles.<role>]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where layouts are persisted.
    pub storage: StorageConfig,
    /// Editor behavior.
    pub console: ConsoleConfig,
    /// Role table.
    pub permissions: PermissionsConfig,
    /// Log verbosity and destination.
    pub logging: LoggingConfig,
}

impl Config {
    /// Resolved path of the layouts document.
    ///
    /// An empty `storage.path` means the XDG data location.
    pub fn layouts_path(&self) -> PathBuf {
        if self.storage.path.is_empty() {
            xdg::layouts_path()
        } else {
            xdg::expand_tilde(&self.storage.path)
        }
    }

    /// Permissions of the configured console role.
    pub fn role_permissions(&self) -> RolePermissions {
        RolePermissions::from_table(&self.permissions.roles, &self.console.role)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Layout persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Prefix of every layout key (`<namespace>:<model>`).
    pub namespace: String,
    /// Path of the layouts document. Empty means the XDG data directory.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: "content-console".to_string(),
            path: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Interactive editor settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Role looked up in `[permissions.roles]`.
    pub role: String,
    /// Render tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            role: "admin".to_string(),
            tick_rate: "250ms".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Parsed tick rate, falling back to [`DEFAULT_TICK_RATE`].
    pub fn tick_rate(&self) -> Duration {
        match humantime::parse_duration(&self.tick_rate) {
            Ok(d) if !d.is_zero() => d,
            Ok(_) => {
                tracing::warn!("tick_rate must be positive, using default");
                DEFAULT_TICK_RATE
            }
            Err(e) => {
                tracing::warn!(tick_rate = %self.tick_rate, "invalid tick_rate: {}", e);
                DEFAULT_TICK_RATE
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// Role table from `[permissions.roles.<role>]` sections.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PermissionsConfig {
    /// role → model (or `*`) → actions.
    pub roles: RoleTable,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        let mut roles = RoleTable::new();
        roles.insert(
            "admin".to_string(),
            BTreeMap::from([(ANY_MODEL.to_string(), Action::ALL.to_vec())]),
        );
        roles.insert(
            "viewer".to_string(),
            BTreeMap::from([(ANY_MODEL.to_string(), vec![Action::Read])]),
        );
        Self { roles }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration from the `[logging]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Verbosity used when `CCON_LOG` is unset.
    pub log_level: LogLevel,
    /// Log destination; empty logs to stderr (or nowhere in the editor).
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            log_file: String::new(),
        }
    }
}

/// `log_level` values.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings (default).
    Warn,
    /// Informational messages.
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
