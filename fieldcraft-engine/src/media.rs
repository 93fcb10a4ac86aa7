//! Batch attachment resolution.

use fieldcraft_codec::{MediaCache, MediaDetail};
use fieldcraft_store::{AttachmentStore, StoreResult};
use fieldcraft_types::AttachmentId;
use std::collections::HashSet;
use tracing::debug;

/// Resolves every id in one [`AttachmentStore::resolve_batch`] call and
/// returns the cache `format` reads from.
///
/// An empty id set makes no call at all. Ids the store does not know are
/// simply absent from the cache. Store errors are returned untouched.
pub fn prime(
    ids: &HashSet<AttachmentId>,
    store: &dyn AttachmentStore,
    detail: MediaDetail,
) -> StoreResult<MediaCache> {
    if ids.is_empty() {
        return Ok(MediaCache::new(detail));
    }

    let resolved = store.resolve_batch(ids)?;
    if resolved.len() < ids.len() {
        debug!("{} of {} attachments unresolvable", ids.len() - resolved.len(), ids.len());
    }
    Ok(MediaCache::from_resolved(resolved, detail))
}
