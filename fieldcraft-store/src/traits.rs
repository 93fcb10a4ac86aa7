//! The host-side collaborators the engine talks to.
//!
//! The engine depends on `Arc<dyn ...>` handles to these traits and never on a
//! concrete backend. Values cross the boundary in their stored form: the
//! engine sanitizes before [`ContentStore::set`] and normalizes after
//! [`ContentStore::get`].

use crate::error::StoreResult;
use fieldcraft_codec::{ResolvedAttachment, StoredValue};
use fieldcraft_model::ContextDescriptor;
use fieldcraft_types::{AttachmentId, RecordId};
use std::collections::{HashMap, HashSet};

/// Per-record field storage, keyed by field name.
pub trait ContentStore: Send + Sync {
    /// The stored value, or `None` when the field was never written.
    fn get(&self, record: RecordId, name: &str) -> StoreResult<Option<StoredValue>>;

    fn set(&self, record: RecordId, name: &str, value: StoredValue) -> StoreResult<()>;

    /// Removes the field. Deleting an absent field is not an error.
    fn delete(&self, record: RecordId, name: &str) -> StoreResult<()>;
}

/// Site-wide storage for options pages, keyed by the full option key.
pub trait OptionsStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<StoredValue>>;

    fn set(&self, key: &str, value: StoredValue) -> StoreResult<()>;

    fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Resolves attachment ids to their metadata.
pub trait AttachmentStore: Send + Sync {
    /// Resolves every id in one round trip. Ids that do not exist are simply
    /// absent from the returned map.
    fn resolve_batch(
        &self,
        ids: &HashSet<AttachmentId>,
    ) -> StoreResult<HashMap<AttachmentId, ResolvedAttachment>>;
}

/// Describes the matching context of a content record.
pub trait ContextResolver: Send + Sync {
    fn describe(&self, record: RecordId) -> StoreResult<ContextDescriptor>;
}
