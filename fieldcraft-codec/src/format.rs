//! Outbound direction: stored representation to the typed API value.
//!
//! Media references are looked up in a [`MediaCache`] primed beforehand; this
//! layer never fetches attachments itself.

use crate::api::ApiValue;
use crate::media::{MediaCache, attachment_id};
use crate::sanitize::{is_truthy, scalar_text};
use crate::stored::{NULL, StoredValue, decode_structure, is_empty_value};
use fieldcraft_model::{FieldDefinition, FieldType};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;

/// Formats one stored value for API output.
pub fn format(stored: &StoredValue, schema: &FieldDefinition, media: &MediaCache) -> ApiValue {
    format_value(stored.as_json(), schema, media, true)
}

/// Formats a stored object against sibling definitions, expanding sections
/// into the same object. Output keys follow definition order.
pub fn format_object(
    source: &Map<String, Value>,
    fields: &[FieldDefinition],
    media: &MediaCache,
) -> IndexMap<String, ApiValue> {
    fieldcraft_model::flatten_sections(fields)
        .into_iter()
        .map(|child| {
            let value = source.get(&child.name).unwrap_or(&NULL);
            (child.name.clone(), format_value(value, child, media, true))
        })
        .collect()
}

fn format_value(value: &Value, schema: &FieldDefinition, media: &MediaCache, use_default: bool) -> ApiValue {
    let value = if schema.field_type.is_structured() {
        decode_structure(value)
    } else {
        Cow::Borrowed(value)
    };

    if is_empty_value(&value) {
        if let Some(default) = schema.default_value.as_ref().filter(|_| use_default) {
            return format_value(default, schema, media, false);
        }
        return empty_for(schema.field_type);
    }

    match schema.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Email | FieldType::Url => {
            scalar_text(&value).map_or(ApiValue::Null, ApiValue::Text)
        }
        FieldType::Number => scalar_text(&value)
            .and_then(|s| parse_number(&s))
            .map_or(ApiValue::Null, ApiValue::Number),
        FieldType::Boolean => ApiValue::Bool(is_truthy(&value)),
        FieldType::Image | FieldType::File => media_value(&value, media),
        FieldType::Gallery => match value.as_ref() {
            Value::Array(items) => ApiValue::List(
                items
                    .iter()
                    .filter_map(|item| attachment_id(item).and_then(|id| media.media(id)))
                    .map(ApiValue::Media)
                    .collect(),
            ),
            _ => ApiValue::Null,
        },
        FieldType::Repeater => match value.as_ref() {
            Value::Array(rows) => ApiValue::List(
                rows.iter()
                    .filter_map(Value::as_object)
                    .map(|row| ApiValue::Object(format_object(row, &schema.children, media)))
                    .collect(),
            ),
            _ => ApiValue::List(Vec::new()),
        },
        FieldType::Group => match value.as_ref() {
            Value::Object(map) => ApiValue::Object(format_object(map, &schema.children, media)),
            // A list carries no child names; every child reads as absent.
            Value::Array(_) => ApiValue::Object(format_object(&Map::new(), &schema.children, media)),
            _ => ApiValue::Null,
        },
        FieldType::Section => ApiValue::Null,
    }
}

fn empty_for(field_type: FieldType) -> ApiValue {
    match field_type {
        FieldType::Boolean => ApiValue::Bool(false),
        FieldType::Repeater => ApiValue::List(Vec::new()),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Number
        | FieldType::Email
        | FieldType::Url
        | FieldType::Image
        | FieldType::File
        | FieldType::Gallery
        | FieldType::Group
        | FieldType::Section => ApiValue::Null,
    }
}

fn media_value(value: &Value, media: &MediaCache) -> ApiValue {
    attachment_id(value)
        .and_then(|id| media.media(id))
        .map_or(ApiValue::Null, ApiValue::Media)
}

/// Integer when the text is an integer literal, float otherwise. Non-finite
/// and non-numeric text yields `None`.
fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::from(i));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}
