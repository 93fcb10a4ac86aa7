//! Collaborator interfaces for fieldcraft.
//!
//! The engine reads and writes through four host-provided collaborators:
//!
//! - [`ContentStore`]: per-record field values
//! - [`OptionsStore`]: site-wide option values
//! - [`AttachmentStore`]: batched attachment metadata lookup
//! - [`ContextResolver`]: the matching context of a record
//!
//! The `Memory*` types implement them over in-process maps.

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{
    DEFAULT_TEMPLATE, MemoryAttachmentStore, MemoryContentStore, MemoryContextResolver,
    MemoryOptionsStore,
};
pub use traits::{AttachmentStore, ContentStore, ContextResolver, OptionsStore};
