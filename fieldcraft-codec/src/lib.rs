//! Value codec for fieldcraft.
//!
//! Converts field values in both directions between the untyped, string-biased
//! representation the host stores and the typed, nested representation served
//! to API consumers. One implementation, dispatched over [`FieldType`], serves
//! every call site.
//!
//! # Read discipline
//!
//! Media fields are formatted from a [`MediaCache`]. A correct read walks the
//! whole field set with [`collect_ids_into`] first, resolves the ids in one
//! batch, and only then calls [`format`] on each field:
//!
//! ```
//! use fieldcraft_codec::{MediaCache, MediaDetail, StoredValue, collect_ids, format};
//! use fieldcraft_model::FieldDefinition;
//!
//! let gallery = FieldDefinition::gallery("photos");
//! let stored = StoredValue::text("[3,7,3,9]").normalize(gallery.field_type);
//!
//! let ids = collect_ids(&stored, &gallery);
//! assert_eq!(ids.len(), 3);
//!
//! // Nothing resolved: every reference drops out.
//! let cache = MediaCache::new(MediaDetail::Basic);
//! let api = format(&stored, &gallery, &cache);
//! assert_eq!(api.as_list().map(|l| l.len()), Some(0));
//! ```
//!
//! [`FieldType`]: fieldcraft_model::FieldType

mod api;
mod format;
mod media;
mod sanitize;
mod stored;
pub mod text;

pub use api::{ApiValue, MediaDetail, MediaObject, MediaSize, ResolvedAttachment};
pub use format::{format, format_object};
pub use media::{MediaCache, attachment_id, collect_ids, collect_ids_into};
pub use sanitize::{FALSE_FLAG, TRUE_FLAG, sanitize, sanitize_object};
pub use stored::StoredValue;
