use fieldcraft_types::AttachmentId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How much of a resolved attachment is exposed in API output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaDetail {
    /// `id`, `url` and `mime_type` only.
    #[default]
    Basic,
    /// Adds `alt`, `title` and the named size variants.
    Full,
}

/// A named rendition of an attachment (thumbnail, medium, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// An attachment as resolved by the Attachment Store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAttachment {
    pub url: String,
    pub mime_type: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sizes: BTreeMap<String, MediaSize>,
}

/// The media object served for image, file and gallery fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaObject {
    pub id: AttachmentId,
    pub url: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<BTreeMap<String, MediaSize>>,
}

impl MediaObject {
    /// Builds the served object for `id` at the requested detail level.
    pub fn from_resolved(id: AttachmentId, resolved: &ResolvedAttachment, detail: MediaDetail) -> Self {
        let full = detail == MediaDetail::Full;
        Self {
            id,
            url: resolved.url.clone(),
            mime_type: resolved.mime_type.clone(),
            alt: full.then(|| resolved.alt.clone()),
            title: full.then(|| resolved.title.clone()),
            sizes: full.then(|| resolved.sizes.clone()),
        }
    }
}

/// The strictly typed, nested value served to API consumers.
///
/// Serializes to plain JSON: `Null` as `null`, media as objects, repeaters as
/// arrays of objects, groups as objects with keys in child order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Media(MediaObject),
    List(Vec<ApiValue>),
    Object(IndexMap<String, ApiValue>),
}

impl ApiValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_media(&self) -> Option<&MediaObject> {
        match self {
            Self::Media(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ApiValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ApiValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key when this is an object.
    pub fn get(&self, key: &str) -> Option<&ApiValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Plain JSON rendering of this value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
