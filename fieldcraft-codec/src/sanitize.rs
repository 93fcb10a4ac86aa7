//! Inbound direction: untyped submitted input to the stored representation.
//!
//! Sanitizing never fails. Malformed input degrades to an empty result
//! (`""`, `null` or `[]`), which the write path turns into a delete.

use crate::media::attachment_id;
use crate::stored::{NULL, StoredValue, decode_structure};
use crate::text;
use fieldcraft_model::{FieldDefinition, FieldType};
use serde_json::{Map, Value};

/// Stored flag for a checked boolean.
pub const TRUE_FLAG: &str = "1";
/// Stored flag for an unchecked boolean.
pub const FALSE_FLAG: &str = "0";

/// Sanitizes one submitted value against its field definition.
///
/// Sections have no storage identity and sanitize to `null`; their children
/// are sanitized by the caller as if they were siblings of the section.
pub fn sanitize(raw: &Value, schema: &FieldDefinition) -> StoredValue {
    StoredValue::from_json(sanitize_value(raw, schema))
}

fn sanitize_value(raw: &Value, schema: &FieldDefinition) -> Value {
    match schema.field_type {
        FieldType::Text => Value::String(scalar_text(raw).map(|s| text::plain_text(&s)).unwrap_or_default()),
        FieldType::Textarea => {
            Value::String(scalar_text(raw).map(|s| text::multiline_text(&s)).unwrap_or_default())
        }
        FieldType::Number => Value::String(scalar_text(raw).map(|s| text::numeric(&s)).unwrap_or_default()),
        FieldType::Email => Value::String(scalar_text(raw).map(|s| text::email(&s)).unwrap_or_default()),
        FieldType::Url => Value::String(scalar_text(raw).map(|s| text::url(&s)).unwrap_or_default()),
        FieldType::Boolean => {
            let flag = if is_truthy(raw) { TRUE_FLAG } else { FALSE_FLAG };
            Value::String(flag.to_string())
        }
        FieldType::Image | FieldType::File => Value::String(
            attachment_id(raw)
                .map(|id| id.to_string())
                .unwrap_or_default(),
        ),
        FieldType::Gallery => sanitize_gallery(raw),
        FieldType::Repeater => sanitize_repeater(raw, schema),
        FieldType::Group => sanitize_group(raw, schema),
        FieldType::Section => Value::Null,
    }
}

/// Sanitizes a whole object of submitted values against a list of sibling
/// definitions, expanding sections in place.
///
/// Keys without a definition are dropped; definitions without a key are
/// sanitized from `null` (so absent booleans become the false flag).
pub fn sanitize_object(source: &Map<String, Value>, fields: &[FieldDefinition]) -> Map<String, Value> {
    fieldcraft_model::flatten_sections(fields)
        .into_iter()
        .map(|child| {
            let raw = source.get(&child.name).unwrap_or(&NULL);
            (child.name.clone(), sanitize_value(raw, child))
        })
        .collect()
}

fn sanitize_gallery(raw: &Value) -> Value {
    let decoded = decode_structure(raw);
    let Value::Array(items) = decoded.as_ref() else {
        return Value::Array(Vec::new());
    };
    Value::Array(
        items
            .iter()
            .filter_map(attachment_id)
            .map(|id| Value::from(id.get()))
            .collect(),
    )
}

fn sanitize_repeater(raw: &Value, schema: &FieldDefinition) -> Value {
    let decoded = decode_structure(raw);
    let Value::Array(rows) = decoded.as_ref() else {
        return Value::Array(Vec::new());
    };
    Value::Array(
        rows.iter()
            .filter_map(Value::as_object)
            .map(|row| Value::Object(sanitize_object(row, &schema.children)))
            .collect(),
    )
}

fn sanitize_group(raw: &Value, schema: &FieldDefinition) -> Value {
    let decoded = decode_structure(raw);
    match decoded.as_ref() {
        Value::Object(map) => Value::Object(sanitize_object(map, &schema.children)),
        _ => Value::Null,
    }
}

/// The textual form of a scalar submission. Structures have none.
pub(crate) fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some(TRUE_FLAG.to_string()),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Checkbox truthiness. A list is a hidden sentinel followed by the checkbox
/// value, so its last element decides.
pub(crate) fn is_truthy(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => text::is_truthy_str(s),
        Value::Array(items) => items.last().is_some_and(is_truthy),
        Value::Null | Value::Object(_) => false,
    }
}
