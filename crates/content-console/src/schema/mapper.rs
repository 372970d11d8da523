//! Classification of raw backend schema entries into field descriptors.
//!
//! The backend sends one object per field carrying an `instance` tag
//! (`String`, `Number`, `ObjectId`, ...) plus optional `enumValues`,
//! `required` and `defaultValue`. Anything unexpected degrades to a text
//! field; mapping never fails.

use serde_json::{Map, Value};

use super::{default_label, FieldDescriptor, FieldType, RelationSpec, SelectOption};

/// Keys the backend adds to every document that are never user-editable.
const RESERVED_KEYS: &[&str] = &["_id", "__v"];

/// Backend kind of a raw schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instance {
    String,
    Numeric,
    Boolean,
    Date,
    Nested,
    ObjectId,
    Array,
    Unknown,
}

impl Instance {
    fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("String") => Instance::String,
            Some("Number") | Some("Decimal128") => Instance::Numeric,
            Some("Boolean") => Instance::Boolean,
            Some("Date") => Instance::Date,
            Some("Map") | Some("Mixed") | Some("Embedded") => Instance::Nested,
            Some("ObjectId") => Instance::ObjectId,
            Some("Array") => Instance::Array,
            _ => Instance::Unknown,
        }
    }
}

/// Maps a schema description object to descriptors in input order.
///
/// Non-object input yields an empty list.
pub fn map_schema(schema: &Value) -> Vec<FieldDescriptor> {
    let Some(entries) = schema.as_object() else {
        tracing::debug!("schema description is not an object, no fields mapped");
        return Vec::new();
    };
    entries
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, raw)| map_field(key, raw))
        .collect()
}

/// Maps a single raw entry. Non-object entries become plain text fields.
fn map_field(key: &str, raw: &Value) -> FieldDescriptor {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    FieldDescriptor {
        key: key.to_string(),
        field_type: classify(obj),
        label: default_label(key),
        required: flag(obj, "required") || flag(obj, "isRequired"),
        default: obj.get("defaultValue").cloned().unwrap_or(Value::Null),
        full_width: flag(obj, "fullWidth"),
    }
}

fn classify(obj: &Map<String, Value>) -> FieldType {
    let instance = Instance::parse(obj.get("instance").and_then(Value::as_str));
    match instance {
        Instance::String => {
            let options = enum_options(obj);
            if options.is_empty() {
                FieldType::Text
            } else {
                FieldType::Select { options }
            }
        }
        Instance::Numeric => FieldType::Number,
        Instance::Boolean => FieldType::Boolean,
        Instance::Date => FieldType::Date,
        Instance::Nested => FieldType::Component,
        Instance::ObjectId => FieldType::Relation {
            relation: RelationSpec { multiple: false },
        },
        Instance::Array if caster_instance(obj) == Some("ObjectId") => FieldType::Relation {
            relation: RelationSpec { multiple: true },
        },
        Instance::Unknown if has_nested_marker(obj) => FieldType::Component,
        Instance::Array | Instance::Unknown => FieldType::Text,
    }
}

fn enum_options(obj: &Map<String, Value>) -> Vec<SelectOption> {
    obj.get("enumValues")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(SelectOption::same)
                .collect()
        })
        .unwrap_or_default()
}

fn caster_instance(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("caster")
        .and_then(|c| c.get("instance"))
        .and_then(Value::as_str)
}

fn has_nested_marker(obj: &Map<String, Value>) -> bool {
    obj.get("schema").is_some_and(Value::is_object) || flag(obj, "$isSingleNested")
}

fn flag(obj: &Map<String, Value>, name: &str) -> bool {
    obj.get(name).and_then(Value::as_bool).unwrap_or(false)
}
