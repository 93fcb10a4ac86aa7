//! In-memory collaborators for tests, fixtures and the CLI.
//!
//! Each store can be taken offline, after which every call fails with
//! [`StoreError::Unavailable`]. Values are kept in their stored form.

use crate::error::{StoreError, StoreResult};
use crate::traits::{AttachmentStore, ContentStore, ContextResolver, OptionsStore};
use fieldcraft_codec::{ResolvedAttachment, StoredValue};
use fieldcraft_model::ContextDescriptor;
use fieldcraft_types::{AttachmentId, RecordId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Template reported for records that were registered without one.
pub const DEFAULT_TEMPLATE: &str = "default";

fn check_online(offline: &AtomicBool, what: &str) -> StoreResult<()> {
    if offline.load(Ordering::SeqCst) {
        return Err(StoreError::Unavailable(format!("{what} is offline")));
    }
    Ok(())
}

// ── Content ──────────────────────────────────────────────────────

/// Record fields held in a map keyed by `(record, name)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    values: Arc<Mutex<BTreeMap<(RecordId, String), StoredValue>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every stored field of one record, by name.
    pub fn record(&self, record: RecordId) -> StoreResult<BTreeMap<String, StoredValue>> {
        let values = self.values.lock().map_err(|_| StoreError::poisoned("content store"))?;
        Ok(values
            .iter()
            .filter(|((id, _), _)| *id == record)
            .map(|((_, name), value)| (name.clone(), value.clone()))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryContentStore {
    fn get(&self, record: RecordId, name: &str) -> StoreResult<Option<StoredValue>> {
        check_online(&self.offline, "content store")?;
        let values = self.values.lock().map_err(|_| StoreError::poisoned("content store"))?;
        Ok(values.get(&(record, name.to_string())).cloned())
    }

    fn set(&self, record: RecordId, name: &str, value: StoredValue) -> StoreResult<()> {
        check_online(&self.offline, "content store")?;
        let mut values = self.values.lock().map_err(|_| StoreError::poisoned("content store"))?;
        debug!("content set {}/{}", record, name);
        values.insert((record, name.to_string()), value);
        Ok(())
    }

    fn delete(&self, record: RecordId, name: &str) -> StoreResult<()> {
        check_online(&self.offline, "content store")?;
        let mut values = self.values.lock().map_err(|_| StoreError::poisoned("content store"))?;
        if values.remove(&(record, name.to_string())).is_some() {
            debug!("content delete {}/{}", record, name);
        }
        Ok(())
    }
}

// ── Options ──────────────────────────────────────────────────────

/// Site-wide options held in a map keyed by option key.
#[derive(Debug, Clone, Default)]
pub struct MemoryOptionsStore {
    values: Arc<Mutex<BTreeMap<String, StoredValue>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryOptionsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// All option keys currently stored, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let values = self.values.lock().map_err(|_| StoreError::poisoned("options store"))?;
        Ok(values.keys().cloned().collect())
    }
}

impl OptionsStore for MemoryOptionsStore {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>> {
        check_online(&self.offline, "options store")?;
        let values = self.values.lock().map_err(|_| StoreError::poisoned("options store"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()> {
        check_online(&self.offline, "options store")?;
        let mut values = self.values.lock().map_err(|_| StoreError::poisoned("options store"))?;
        debug!("option set {}", key);
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        check_online(&self.offline, "options store")?;
        let mut values = self.values.lock().map_err(|_| StoreError::poisoned("options store"))?;
        values.remove(key);
        Ok(())
    }
}

// ── Attachments ──────────────────────────────────────────────────

/// Attachment metadata by id. Counts batch calls so callers can assert a read
/// resolved its media in a single round trip.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttachmentStore {
    attachments: Arc<Mutex<HashMap<AttachmentId, ResolvedAttachment>>>,
    batch_calls: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl MemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: AttachmentId, attachment: ResolvedAttachment) -> StoreResult<()> {
        let mut attachments = self
            .attachments
            .lock()
            .map_err(|_| StoreError::poisoned("attachment store"))?;
        attachments.insert(id, attachment);
        Ok(())
    }

    /// Number of `resolve_batch` calls served so far, failed ones included.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl AttachmentStore for MemoryAttachmentStore {
    fn resolve_batch(
        &self,
        ids: &HashSet<AttachmentId>,
    ) -> StoreResult<HashMap<AttachmentId, ResolvedAttachment>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        check_online(&self.offline, "attachment store")?;
        let attachments = self
            .attachments
            .lock()
            .map_err(|_| StoreError::poisoned("attachment store"))?;
        let resolved: HashMap<_, _> = ids
            .iter()
            .filter_map(|id| attachments.get(id).map(|a| (*id, a.clone())))
            .collect();
        debug!("resolved {} of {} attachments", resolved.len(), ids.len());
        Ok(resolved)
    }
}

// ── Context ──────────────────────────────────────────────────────

/// Record contexts registered up front.
#[derive(Debug, Clone, Default)]
pub struct MemoryContextResolver {
    contexts: Arc<Mutex<HashMap<RecordId, ContextDescriptor>>>,
}

impl MemoryContextResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the context of a record. The record id on the descriptor is
    /// overwritten with `record`.
    pub fn register(&self, record: RecordId, mut context: ContextDescriptor) -> StoreResult<()> {
        context.record_id = Some(record);
        let mut contexts = self
            .contexts
            .lock()
            .map_err(|_| StoreError::poisoned("context resolver"))?;
        contexts.insert(record, context);
        Ok(())
    }
}

impl ContextResolver for MemoryContextResolver {
    fn describe(&self, record: RecordId) -> StoreResult<ContextDescriptor> {
        let contexts = self
            .contexts
            .lock()
            .map_err(|_| StoreError::poisoned("context resolver"))?;
        let mut context = contexts
            .get(&record)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("record {record}")))?;
        context
            .template_id
            .get_or_insert_with(|| DEFAULT_TEMPLATE.to_string());
        Ok(context)
    }
}
