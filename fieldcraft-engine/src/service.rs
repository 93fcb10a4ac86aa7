//! Read/write orchestration over the collaborator stores.
//!
//! Reads follow a fixed order: resolve the field set, fetch and normalize
//! every stored value, collect attachment ids across all of them, prime the
//! media cache once, then format. Writes resolve the field set, sanitize each
//! submitted value, and upsert or delete it.

use crate::config::{CollisionPolicy, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::media::prime;
use crate::resolve::resolve;
use fieldcraft_codec::{ApiValue, StoredValue, collect_ids_into, format, sanitize};
use fieldcraft_model::{ContextDescriptor, FieldDefinition, FieldGroup, FieldType, validate_groups};
use fieldcraft_store::{AttachmentStore, ContentStore, ContextResolver, OptionsStore, StoreResult};
use fieldcraft_types::RecordId;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handles to the host collaborators.
#[derive(Clone)]
pub struct Collaborators {
    pub content: Arc<dyn ContentStore>,
    pub options: Arc<dyn OptionsStore>,
    pub attachments: Arc<dyn AttachmentStore>,
    pub contexts: Arc<dyn ContextResolver>,
}

/// Outcome of a write, by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Fields upserted with a non-empty value.
    pub updated: Vec<String>,
    /// Fields whose value sanitized to empty and was deleted.
    pub deleted: Vec<String>,
    /// Submitted names with no definition in the resolved schema.
    pub ignored: Vec<String>,
}

/// Where the values of one read or write live.
#[derive(Clone, Copy)]
enum Target {
    Record(RecordId),
    Options,
}

/// Reads and writes field values for records and options pages.
pub struct FieldService {
    stores: Collaborators,
    groups: Vec<FieldGroup>,
    config: EngineConfig,
}

impl FieldService {
    /// Creates a service over `groups`.
    ///
    /// Schema issues are logged. Under [`CollisionPolicy::Reject`] any name
    /// collision fails construction.
    pub fn new(stores: Collaborators, groups: Vec<FieldGroup>, config: EngineConfig) -> EngineResult<Self> {
        let issues = validate_groups(&groups);
        for issue in &issues {
            warn!("schema issue: {}", issue);
        }

        if config.name_collisions == CollisionPolicy::Reject {
            let collisions: Vec<_> = issues.into_iter().filter(|i| i.is_collision()).collect();
            if !collisions.is_empty() {
                return Err(EngineError::Schema(collisions));
            }
        }

        info!("Field service ready with {} field groups", groups.len());
        Ok(Self { stores, groups, config })
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The context of a record, as the resolver describes it.
    pub fn record_context(&self, record: RecordId) -> EngineResult<ContextDescriptor> {
        Ok(self.stores.contexts.describe(record)?)
    }

    /// The flat field map that applies to a record.
    pub fn record_fields(&self, record: RecordId) -> EngineResult<IndexMap<String, FieldDefinition>> {
        let ctx = self.record_context(record)?;
        Ok(resolve(&ctx, &self.groups))
    }

    /// The flat field map that applies to an options page.
    pub fn options_fields(&self, page_key: &str) -> IndexMap<String, FieldDefinition> {
        resolve(&ContextDescriptor::for_options_page(page_key), &self.groups)
    }

    /// Every field value of a record, formatted for API output in field order.
    pub fn read_record(&self, record: RecordId) -> EngineResult<IndexMap<String, ApiValue>> {
        let fields = self.record_fields(record)?;
        debug!("reading {} fields for record {}", fields.len(), record);
        self.read_fields(&fields, Target::Record(record))
    }

    /// Sanitizes and persists submitted values for a record.
    pub fn write_record(&self, record: RecordId, input: &Map<String, Value>) -> EngineResult<WriteSummary> {
        let fields = self.record_fields(record)?;
        let summary = self.write_fields(&fields, input, Target::Record(record))?;
        info!(
            "Record {}: {} updated, {} deleted, {} ignored",
            record,
            summary.updated.len(),
            summary.deleted.len(),
            summary.ignored.len()
        );
        Ok(summary)
    }

    /// Every field value of an options page, formatted for API output.
    pub fn read_options(&self, page_key: &str) -> EngineResult<IndexMap<String, ApiValue>> {
        let fields = self.options_fields(page_key);
        debug!("reading {} fields for options page {}", fields.len(), page_key);
        self.read_fields(&fields, Target::Options)
    }

    /// Sanitizes and persists submitted values for an options page.
    pub fn write_options(&self, page_key: &str, input: &Map<String, Value>) -> EngineResult<WriteSummary> {
        let fields = self.options_fields(page_key);
        let summary = self.write_fields(&fields, input, Target::Options)?;
        info!(
            "Options page {}: {} updated, {} deleted, {} ignored",
            page_key,
            summary.updated.len(),
            summary.deleted.len(),
            summary.ignored.len()
        );
        Ok(summary)
    }

    fn read_fields(
        &self,
        fields: &IndexMap<String, FieldDefinition>,
        target: Target,
    ) -> EngineResult<IndexMap<String, ApiValue>> {
        let mut stored = Vec::with_capacity(fields.len());
        let mut ids = HashSet::new();
        for (name, schema) in fields {
            let value = self
                .fetch(target, name)?
                .map(|v| v.normalize(schema.field_type))
                .unwrap_or_default();
            collect_ids_into(value.as_json(), schema, &mut ids);
            stored.push((name, schema, value));
        }

        let cache = prime(&ids, self.stores.attachments.as_ref(), self.config.media_detail)?;

        Ok(stored
            .into_iter()
            .map(|(name, schema, value)| (name.clone(), format(&value, schema, &cache)))
            .collect())
    }

    fn write_fields(
        &self,
        fields: &IndexMap<String, FieldDefinition>,
        input: &Map<String, Value>,
        target: Target,
    ) -> EngineResult<WriteSummary> {
        let mut summary = WriteSummary::default();
        let unchecked = Value::Null;

        for name in input.keys().filter(|name| !fields.contains_key(*name)) {
            debug!("ignoring unknown field '{}'", name);
            summary.ignored.push(name.clone());
        }

        for (name, schema) in fields {
            let raw = match input.get(name) {
                Some(raw) => raw,
                // An unchecked checkbox submits nothing but its hidden sentinel.
                None if schema.field_type == FieldType::Boolean => &unchecked,
                None => continue,
            };

            match sanitize(raw, schema).into_persisted() {
                Some(value) => {
                    debug!("field '{}' sanitized to {:?}", name, value.as_json());
                    self.persist(target, name, value)?;
                    summary.updated.push(name.clone());
                }
                None => {
                    debug!("field '{}' sanitized to empty, deleting", name);
                    self.remove(target, name)?;
                    summary.deleted.push(name.clone());
                }
            }
        }

        Ok(summary)
    }

    fn fetch(&self, target: Target, name: &str) -> StoreResult<Option<StoredValue>> {
        match target {
            Target::Record(record) => self.stores.content.get(record, name),
            Target::Options => self.stores.options.get(&self.config.options_key(name)),
        }
    }

    fn persist(&self, target: Target, name: &str, value: StoredValue) -> StoreResult<()> {
        match target {
            Target::Record(record) => self.stores.content.set(record, name, value),
            Target::Options => self.stores.options.set(&self.config.options_key(name), value),
        }
    }

    fn remove(&self, target: Target, name: &str) -> StoreResult<()> {
        match target {
            Target::Record(record) => self.stores.content.delete(record, name),
            Target::Options => self.stores.options.delete(&self.config.options_key(name)),
        }
    }
}
