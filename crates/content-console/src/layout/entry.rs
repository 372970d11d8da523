use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display width of a field in the two-column grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSize {
    /// One column.
    #[default]
    Half,
    /// Both columns.
    Full,
}

impl FieldSize {
    /// Returns the other size.
    pub fn toggled(self) -> Self {
        match self {
            FieldSize::Half => FieldSize::Full,
            FieldSize::Full => FieldSize::Half,
        }
    }

    /// Normalizes a persisted size string: only `"full"` is full.
    pub fn from_persisted(raw: &str) -> Self {
        if raw == "full" {
            FieldSize::Full
        } else {
            FieldSize::Half
        }
    }
}

// Lenient on purpose: anything that is not exactly "full" reads as half.
impl<'de> Deserialize<'de> for FieldSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .map(FieldSize::from_persisted)
            .unwrap_or(FieldSize::Half))
    }
}

impl fmt::Display for FieldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSize::Half => write!(f, "half"),
            FieldSize::Full => write!(f, "full"),
        }
    }
}

impl FromStr for FieldSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half" => Ok(FieldSize::Half),
            "full" => Ok(FieldSize::Full),
            _ => Err(format!("invalid size: {s} (expected half or full)")),
        }
    }
}

/// Persisted position and size of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    /// Field key this entry places.
    pub id: String,
    /// Display size.
    #[serde(default)]
    pub size: FieldSize,
}

impl LayoutEntry {
    /// Creates a half-width entry.
    pub fn half(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: FieldSize::Half,
        }
    }

    /// Creates a full-width entry.
    pub fn full(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: FieldSize::Full,
        }
    }
}

/// Builds the default layout: one half entry per key, in order.
pub fn default_layout<K: AsRef<str>>(field_keys: &[K]) -> Vec<LayoutEntry> {
    field_keys
        .iter()
        .map(|k| LayoutEntry::half(k.as_ref()))
        .collect()
}
