//! Attachment references: id coercion, the per-read media cache and the
//! collector that gathers every referenced id before a read is formatted.

use crate::api::{MediaDetail, MediaObject, ResolvedAttachment};
use crate::stored::{NULL, StoredValue, decode_structure, is_empty_value};
use fieldcraft_model::{FieldDefinition, FieldType};
use fieldcraft_types::AttachmentId;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Resolved attachments for one read operation.
///
/// Primed once from a single batch lookup; formatting only ever reads from
/// it. Ids missing from the cache format as `null`.
#[derive(Debug, Clone, Default)]
pub struct MediaCache {
    entries: HashMap<AttachmentId, ResolvedAttachment>,
    detail: MediaDetail,
}

impl MediaCache {
    pub fn new(detail: MediaDetail) -> Self {
        Self {
            entries: HashMap::new(),
            detail,
        }
    }

    /// Wraps the result of a batch resolution.
    pub fn from_resolved(entries: HashMap<AttachmentId, ResolvedAttachment>, detail: MediaDetail) -> Self {
        Self { entries, detail }
    }

    pub fn insert(&mut self, id: AttachmentId, resolved: ResolvedAttachment) {
        self.entries.insert(id, resolved);
    }

    pub fn get(&self, id: AttachmentId) -> Option<&ResolvedAttachment> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: AttachmentId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn detail(&self) -> MediaDetail {
        self.detail
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The served media object for `id`, or `None` when it did not resolve.
    pub fn media(&self, id: AttachmentId) -> Option<MediaObject> {
        self.get(id)
            .map(|resolved| MediaObject::from_resolved(id, resolved, self.detail))
    }
}

/// Coerces a submitted or stored reference to a positive attachment id.
///
/// Accepts integers, integral floats, decimal strings and media objects
/// carrying an `id`. Zero, negatives and anything else yield `None`.
pub fn attachment_id(value: &Value) -> Option<AttachmentId> {
    let raw = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Object(map) => return map.get("id").and_then(attachment_id),
        _ => None,
    }?;
    (raw > 0).then_some(AttachmentId::new(raw))
}

/// Every attachment id reachable from `value` under `schema`, including ids
/// named by default values that formatting would substitute.
pub fn collect_ids(value: &StoredValue, schema: &FieldDefinition) -> HashSet<AttachmentId> {
    let mut ids = HashSet::new();
    collect_ids_into(value.as_json(), schema, &mut ids);
    ids
}

/// Accumulating form of [`collect_ids`], for walking a whole field set into
/// one set before a single batch resolution.
pub fn collect_ids_into(value: &Value, schema: &FieldDefinition, ids: &mut HashSet<AttachmentId>) {
    walk(value, schema, ids, true);
}

fn walk(value: &Value, schema: &FieldDefinition, ids: &mut HashSet<AttachmentId>, use_default: bool) {
    let value = if schema.field_type.is_structured() {
        decode_structure(value)
    } else {
        Cow::Borrowed(value)
    };

    if is_empty_value(&value) {
        if let Some(default) = schema.default_value.as_ref().filter(|_| use_default) {
            walk(default, schema, ids, false);
        }
        return;
    }

    match schema.field_type {
        FieldType::Image | FieldType::File => {
            ids.extend(attachment_id(&value));
        }
        FieldType::Gallery => {
            if let Value::Array(items) = value.as_ref() {
                ids.extend(items.iter().filter_map(attachment_id));
            }
        }
        FieldType::Repeater => {
            if let Value::Array(rows) = value.as_ref() {
                for row in rows {
                    if let Value::Object(row) = row {
                        collect_children(row, schema, ids);
                    }
                }
            }
        }
        FieldType::Group => match value.as_ref() {
            Value::Object(map) => collect_children(map, schema, ids),
            // Formatting reads every child as absent, so their defaults count.
            Value::Array(_) => collect_children(&serde_json::Map::new(), schema, ids),
            _ => {}
        },
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Number
        | FieldType::Email
        | FieldType::Url
        | FieldType::Boolean
        | FieldType::Section => {}
    }
}

fn collect_children(
    source: &serde_json::Map<String, Value>,
    schema: &FieldDefinition,
    ids: &mut HashSet<AttachmentId>,
) {
    for child in schema.storage_children() {
        let child_value = source.get(&child.name).unwrap_or(&NULL);
        walk(child_value, child, ids, true);
    }
}
