//! Fixture loading and command bodies for the `fieldcraft` binary.
//!
//! A fixture is one JSON document describing field groups plus the state of
//! every collaborator store:
//!
//! ```json
//! {
//!   "groups": [ ... ],
//!   "records": [{ "id": 1, "context": { "content_type": "post" }, "values": { "title": "Hi" } }],
//!   "options": { "options_phone": "555" },
//!   "attachments": [{ "id": 4, "url": "/logo.png", "mime_type": "image/png" }]
//! }
//! ```

use anyhow::{Context, Result};
use fieldcraft_codec::{ResolvedAttachment, StoredValue};
use fieldcraft_engine::{Collaborators, EngineConfig, FieldService};
use fieldcraft_model::{ContextDescriptor, FieldGroup, validate_groups};
use fieldcraft_store::{
    ContentStore, MemoryAttachmentStore, MemoryContentStore, MemoryContextResolver,
    MemoryOptionsStore, OptionsStore,
};
use fieldcraft_types::{AttachmentId, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// A content record and its stored field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFixture {
    pub id: RecordId,
    #[serde(default)]
    pub context: ContextDescriptor,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentFixture {
    pub id: AttachmentId,
    #[serde(flatten)]
    pub attachment: ResolvedAttachment,
}

/// Field groups plus the initial contents of every store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub groups: Vec<FieldGroup>,
    #[serde(default)]
    pub records: Vec<RecordFixture>,
    /// Option key to stored value.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
    #[serde(default)]
    pub attachments: Vec<AttachmentFixture>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Schema issues of the fixture's field groups, rendered.
    pub fn validate(&self) -> Vec<String> {
        validate_groups(&self.groups)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Fills in-memory stores from the fixture and builds a service over them.
    pub fn into_workspace(self, config: EngineConfig) -> Result<Workspace> {
        let content = MemoryContentStore::new();
        let options = MemoryOptionsStore::new();
        let attachments = MemoryAttachmentStore::new();
        let contexts = MemoryContextResolver::new();

        for record in self.records {
            for (name, value) in record.values {
                content.set(record.id, &name, StoredValue::from_json(value))?;
            }
            contexts.register(record.id, record.context)?;
        }
        for (key, value) in self.options {
            options.set(&key, StoredValue::from_json(value))?;
        }
        for entry in self.attachments {
            attachments.insert(entry.id, entry.attachment)?;
        }

        let stores = Collaborators {
            content: Arc::new(content.clone()),
            options: Arc::new(options.clone()),
            attachments: Arc::new(attachments.clone()),
            contexts: Arc::new(contexts),
        };
        let service = FieldService::new(stores, self.groups, config).context("Invalid field groups")?;
        info!("Fixture loaded, {} stored record values", content.len());

        Ok(Workspace {
            service,
            content,
            options,
            attachments,
        })
    }
}

/// What a command reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Record(RecordId),
    OptionsPage(String),
}

/// A fixture loaded into live stores.
pub struct Workspace {
    pub service: FieldService,
    pub content: MemoryContentStore,
    pub options: MemoryOptionsStore,
    pub attachments: MemoryAttachmentStore,
}

impl Workspace {
    /// Field definitions applying to `target`, by name.
    pub fn resolve(&self, target: &Target) -> Result<Value> {
        let fields = match target {
            Target::Record(record) => self.service.record_fields(*record)?,
            Target::OptionsPage(page) => self.service.options_fields(page),
        };
        Ok(serde_json::to_value(&fields)?)
    }

    /// Formatted field values of `target`.
    pub fn read(&self, target: &Target) -> Result<Value> {
        let values = match target {
            Target::Record(record) => self.service.read_record(*record)?,
            Target::OptionsPage(page) => self.service.read_options(page)?,
        };
        Ok(serde_json::to_value(&values)?)
    }

    /// Writes `input` to `target` and reports the summary together with the
    /// stored state afterwards.
    pub fn write(&self, target: &Target, input: &Map<String, Value>) -> Result<Value> {
        let (summary, stored) = match target {
            Target::Record(record) => {
                let summary = self.service.write_record(*record, input)?;
                (summary, serde_json::to_value(self.content.record(*record)?)?)
            }
            Target::OptionsPage(page) => {
                let summary = self.service.write_options(page, input)?;
                let mut stored = Map::new();
                for key in self.options.keys()? {
                    if let Some(value) = self.options.get(&key)? {
                        stored.insert(key, value.into_json());
                    }
                }
                (summary, Value::Object(stored))
            }
        };
        Ok(json!({ "summary": summary, "stored": stored }))
    }
}

/// Parses write input given either inline or as `@path`.
pub fn parse_input(arg: &str) -> Result<Map<String, Value>> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {path}"))?,
        None => arg.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("Input is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("Input must be a JSON object, got {other}"),
    }
}
