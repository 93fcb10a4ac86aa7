//! The at-rest value representation and its wire adapter.
//!
//! Scalars are stored as plain strings. Galleries, repeaters and groups are
//! stored as JSON text, but hosts hand them back either as that text or as
//! the already-decoded structure (and older rows are sometimes encoded
//! twice). [`StoredValue::normalize`] folds all of those into the decoded
//! structure once, at the store boundary; [`StoredValue::into_persisted`]
//! produces the exact form written back.

use fieldcraft_model::FieldType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// How many layers of string encoding are peeled off a structured value.
const MAX_DECODE_DEPTH: usize = 2;

/// Stand-in for a key missing from a row or group object.
pub(crate) static NULL: Value = Value::Null;

/// An untyped stored value, as the host's metadata storage holds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredValue(Value);

impl StoredValue {
    /// The absent value.
    pub fn null() -> Self {
        Self(Value::Null)
    }

    /// A plain string value.
    pub fn text(s: impl Into<String>) -> Self {
        Self(Value::String(s.into()))
    }

    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    /// The string content, when this is a plain string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Whether this value means "nothing stored": `null`, `""` or `[]`.
    ///
    /// At the persistence boundary an empty value maps to a delete.
    pub fn is_empty(&self) -> bool {
        is_empty_value(&self.0)
    }

    /// Decodes string-encoded structures for structured field types.
    ///
    /// Scalar types are returned unchanged; a structured value that does not
    /// decode to an array or object is kept as-is and degrades in the codec.
    pub fn normalize(self, field_type: FieldType) -> Self {
        if !field_type.is_structured() {
            return self;
        }
        let decoded = match decode_structure(&self.0) {
            Cow::Owned(decoded) => Some(decoded),
            Cow::Borrowed(_) => None,
        };
        decoded.map_or(self, Self)
    }

    /// The wire text for this value, or `None` when it should be deleted.
    ///
    /// Structures are serialized to compact JSON; booleans and numbers become
    /// their literal text.
    pub fn to_wire(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match &self.0 {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// The value exactly as it should be handed to a store's `set`, or `None`
    /// when the field should be deleted instead.
    pub fn into_persisted(self) -> Option<StoredValue> {
        self.to_wire().map(StoredValue::text)
    }
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Peels JSON string encoding off a structured value.
///
/// Returns the input borrowed when nothing had to be decoded, including when
/// a string does not parse to an array or object.
pub(crate) fn decode_structure(value: &Value) -> Cow<'_, Value> {
    let mut current = Cow::Borrowed(value);
    for _ in 0..MAX_DECODE_DEPTH {
        let Value::String(text) = current.as_ref() else {
            break;
        };
        let trimmed = text.trim();
        if !(trimmed.starts_with('[') || trimmed.starts_with('{') || trimmed.starts_with('"')) {
            break;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(decoded) => current = Cow::Owned(decoded),
            Err(_) => break,
        }
    }
    if matches!(current.as_ref(), Value::Array(_) | Value::Object(_)) {
        current
    } else {
        Cow::Borrowed(value)
    }
}
