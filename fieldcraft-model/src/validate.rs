//! Authoring-time checks over a set of field groups.
//!
//! Storage is flat and addressed by name, so several configurations that load
//! fine still overwrite each other's values at runtime. These checks surface
//! them; whether to refuse such a configuration is the caller's decision.

use crate::group::FieldGroup;
use crate::schema::{FieldDefinition, FieldType, flatten_sections};
use std::collections::{HashMap, HashSet};

/// A problem found in a field group configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaIssue {
    #[error("field group {group}: duplicate field name '{name}' under {parent}")]
    DuplicateSiblingName {
        group: String,
        parent: String,
        name: String,
    },

    #[error("field group {group}: field '{name}' has an empty name or key")]
    MissingIdentity { group: String, name: String },

    #[error("field group {group}: {field_type:?} field '{name}' has no children")]
    EmptyChildren {
        group: String,
        name: String,
        field_type: FieldType,
    },

    #[error("field group {group}: {field_type:?} field '{name}' carries children that are ignored")]
    UnexpectedChildren {
        group: String,
        name: String,
        field_type: FieldType,
    },

    #[error("root field '{name}' is defined by both {first_group} and {second_group}")]
    RootCollision {
        name: String,
        first_group: String,
        second_group: String,
    },

    #[error("field group {group}: child '{name}' of '{parent}' shares its name with a root field")]
    ChildShadowsRoot {
        group: String,
        parent: String,
        name: String,
    },
}

impl SchemaIssue {
    /// Whether the issue leads to values overwriting each other in storage.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            Self::DuplicateSiblingName { .. }
                | Self::RootCollision { .. }
                | Self::ChildShadowsRoot { .. }
        )
    }
}

/// Checks every group and the way groups interact when resolved together.
pub fn validate_groups(groups: &[FieldGroup]) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let mut root_owner: HashMap<&str, &str> = HashMap::new();

    for group in groups {
        check_level(&group.key, "<root>", &group.fields, &mut issues);
        for field in flatten_sections(&group.fields) {
            match root_owner.get(field.name.as_str()) {
                Some(first) if *first != group.key => issues.push(SchemaIssue::RootCollision {
                    name: field.name.clone(),
                    first_group: (*first).to_string(),
                    second_group: group.key.clone(),
                }),
                Some(_) => {}
                None => {
                    root_owner.insert(&field.name, &group.key);
                }
            }
        }
    }

    let root_names: HashSet<&str> = root_owner.keys().copied().collect();
    for group in groups {
        for field in flatten_sections(&group.fields) {
            check_shadowing(&group.key, field, &root_names, &mut issues);
        }
    }

    issues
}

fn check_level(group: &str, parent: &str, fields: &[FieldDefinition], issues: &mut Vec<SchemaIssue>) {
    let mut seen = HashSet::new();
    for field in flatten_sections(fields) {
        if !seen.insert(field.name.as_str()) {
            issues.push(SchemaIssue::DuplicateSiblingName {
                group: group.into(),
                parent: parent.into(),
                name: field.name.clone(),
            });
        }
    }
    for field in fields {
        check_node(group, field, issues);
    }
}

fn check_node(group: &str, field: &FieldDefinition, issues: &mut Vec<SchemaIssue>) {
    if field.name.trim().is_empty() || field.key.as_str().is_empty() {
        issues.push(SchemaIssue::MissingIdentity {
            group: group.into(),
            name: field.name.clone(),
        });
    }

    if !field.field_type.has_children() {
        if !field.children.is_empty() {
            issues.push(SchemaIssue::UnexpectedChildren {
                group: group.into(),
                name: field.name.clone(),
                field_type: field.field_type,
            });
        }
        return;
    }

    if field.children.is_empty() {
        issues.push(SchemaIssue::EmptyChildren {
            group: group.into(),
            name: field.name.clone(),
            field_type: field.field_type,
        });
    }

    if field.field_type == FieldType::Section {
        // Section members share the enclosing level's namespace, which
        // check_level already covered.
        for child in &field.children {
            check_node(group, child, issues);
        }
    } else {
        check_level(group, &field.name, &field.children, issues);
    }
}

fn check_shadowing(
    group: &str,
    field: &FieldDefinition,
    root_names: &HashSet<&str>,
    issues: &mut Vec<SchemaIssue>,
) {
    for child in field.storage_children() {
        if root_names.contains(child.name.as_str()) {
            issues.push(SchemaIssue::ChildShadowsRoot {
                group: group.into(),
                parent: field.name.clone(),
                name: child.name.clone(),
            });
        }
        check_shadowing(group, child, root_names, issues);
    }
}
