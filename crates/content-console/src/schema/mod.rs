//! Field descriptors derived from a backend schema description.
//!
//! The backend describes each model as a loosely typed JSON object. The
//! [`mapper`] classifies every entry into a closed [`FieldType`] so that
//! rendering and editing code never inspects raw backend type names.

pub mod mapper;

pub use mapper::map_schema;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selectable value of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the user.
    pub label: String,
    /// Value stored in the record.
    pub value: String,
}

impl SelectOption {
    /// Creates an option whose label and value are the same string.
    pub fn same(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

/// Relation shape of a `relation` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// Whether the field references several documents.
    pub multiple: bool,
}

/// Closed set of field kinds the form engine knows how to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// Free text input.
    Text,
    /// Numeric input.
    Number,
    /// Checkbox.
    Boolean,
    /// Date picker; values are ISO-8601 strings.
    Date,
    /// Fixed list of choices.
    Select {
        /// Choices in backend order.
        options: Vec<SelectOption>,
    },
    /// Reference to other documents.
    Relation {
        /// Relation shape.
        relation: RelationSpec,
    },
    /// Nested structure edited as a group.
    Component,
}

impl FieldType {
    /// Short lowercase name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Select { .. } => "select",
            FieldType::Relation { .. } => "relation",
            FieldType::Component => "component",
        }
    }

    /// Grouping types always span the full grid width.
    pub fn is_grouping(&self) -> bool {
        matches!(self, FieldType::Component)
    }

    /// Converts text typed into the editor into a record value.
    ///
    /// Returns `None` when the input is not valid for this type, or when the
    /// type cannot be edited inline (relations and components).
    pub fn coerce_input(&self, input: &str) -> Option<Value> {
        let trimmed = input.trim();
        match self {
            FieldType::Text => Some(Value::String(input.to_string())),
            FieldType::Date => {
                if trimmed.is_empty() {
                    Some(Value::Null)
                } else {
                    Some(Value::String(trimmed.to_string()))
                }
            }
            FieldType::Number => {
                if trimmed.is_empty() {
                    return Some(Value::Null);
                }
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Some(Value::from(n));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
            }
            FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "on" => Some(Value::Bool(true)),
                "false" | "no" | "n" | "0" | "off" => Some(Value::Bool(false)),
                _ => None,
            },
            FieldType::Select { options } => options
                .iter()
                .find(|o| o.value == trimmed || o.label == trimmed)
                .map(|o| Value::String(o.value.clone())),
            FieldType::Relation { .. } | FieldType::Component => None,
        }
    }
}

/// Normalized, typed description of one editable content attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Backend field name, unique within a model.
    pub key: String,
    /// Field kind with its kind-specific data.
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Display label.
    pub label: String,
    /// Whether the backend marks the field as required.
    pub required: bool,
    /// Backend default value, or null.
    pub default: Value,
    /// Explicit full-width marker from the schema.
    #[serde(default, rename = "fullWidth", skip_serializing_if = "std::ops::Not::not")]
    pub full_width: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor with the default label and no default value.
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            label: default_label(key),
            required: false,
            default: Value::Null,
            full_width: false,
        }
    }

    /// Whether the grid must give this field both columns.
    pub fn is_wide(&self) -> bool {
        self.full_width || self.field_type.is_grouping()
    }
}

/// Upper-cases the first character of `key` and keeps the rest unchanged.
pub fn default_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collects the keys of `fields` in order.
pub fn field_keys(fields: &[FieldDescriptor]) -> Vec<String> {
    fields.iter().map(|f| f.key.clone()).collect()
}
