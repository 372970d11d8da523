//! Permission checks gating create/read/update/delete per model.
//!
//! The grid only asks one question, `can(model, Update)`, to decide whether
//! structure and values are editable. Roles are configured in TOML:
//!
//! ```toml
//! [permissions.roles.editor]
//! blog = ["read", "update"]
//! "*" = ["read"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Wildcard model key matching every model.
pub const ANY_MODEL: &str = "*";

/// Operation a role may perform on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create documents.
    Create,
    /// Read documents.
    Read,
    /// Edit documents and their form layout.
    Update,
    /// Delete documents.
    Delete,
}

impl Action {
    /// All actions, in CRUD order.
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(format!("invalid action: {s}")),
        }
    }
}

/// Capability answering whether an action on a model is allowed.
pub trait PermissionCheck {
    /// Returns `true` if `action` is permitted on `model_key`.
    fn can(&self, model_key: &str, action: Action) -> bool;
}

impl<T: PermissionCheck + ?Sized> PermissionCheck for &T {
    fn can(&self, model_key: &str, action: Action) -> bool {
        (**self).can(model_key, action)
    }
}

/// Grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn can(&self, _model_key: &str, _action: Action) -> bool {
        true
    }
}

/// Grants nothing but reads; used for previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl PermissionCheck for ReadOnly {
    fn can(&self, _model_key: &str, action: Action) -> bool {
        action == Action::Read
    }
}

/// Role table as it appears in configuration: role → model (or `*`) → actions.
pub type RoleTable = BTreeMap<String, BTreeMap<String, Vec<Action>>>;

/// Permissions of a single role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePermissions {
    role: String,
    grants: BTreeMap<String, BTreeSet<Action>>,
}

impl RolePermissions {
    /// Creates an empty grant set for `role`.
    pub fn new(role: &str) -> Self {
        Self {
            role: role.to_string(),
            grants: BTreeMap::new(),
        }
    }

    /// Looks up `role` in `table`. Unknown roles get no permissions.
    pub fn from_table(table: &RoleTable, role: &str) -> Self {
        let mut perms = Self::new(role);
        match table.get(role) {
            Some(models) => {
                for (model, actions) in models {
                    perms.grant(model, actions.iter().copied());
                }
            }
            None => tracing::warn!(role, "role not configured, all actions denied"),
        }
        perms
    }

    /// Adds `actions` on `model_key` (or [`ANY_MODEL`]).
    pub fn grant(&mut self, model_key: &str, actions: impl IntoIterator<Item = Action>) {
        self.grants
            .entry(model_key.to_string())
            .or_default()
            .extend(actions);
    }

    /// Name of the role.
    pub fn role(&self) -> &str {
        &self.role
    }
}

impl PermissionCheck for RolePermissions {
    fn can(&self, model_key: &str, action: Action) -> bool {
        let allowed = |key: &str| {
            self.grants
                .get(key)
                .is_some_and(|actions| actions.contains(&action))
        };
        allowed(model_key) || allowed(ANY_MODEL)
    }
}
