//! Schema resolution: which fields exist for a context.

use crate::rules::field_group_applies;
use fieldcraft_model::{ContextDescriptor, FieldDefinition, FieldGroup, flatten_sections};
use indexmap::IndexMap;
use tracing::debug;

/// The field groups that apply to `ctx`, in registration order.
pub fn applicable_groups<'a>(ctx: &ContextDescriptor, groups: &'a [FieldGroup]) -> Vec<&'a FieldGroup> {
    groups
        .iter()
        .filter(|group| field_group_applies(group, ctx))
        .collect()
}

/// The flat field map for `ctx`, keyed by storage name.
///
/// Sections are expanded into the map. When two applying groups define the
/// same name, the later group's definition wins; the entry keeps the position
/// of its first occurrence.
pub fn resolve(ctx: &ContextDescriptor, groups: &[FieldGroup]) -> IndexMap<String, FieldDefinition> {
    let mut fields = IndexMap::new();
    for group in applicable_groups(ctx, groups) {
        for field in flatten_sections(&group.fields) {
            if fields.insert(field.name.clone(), field.clone()).is_some() {
                debug!("field '{}' overridden by group {}", field.name, group.key);
            }
        }
    }
    fields
}
