//! Field schema model for fieldcraft.
//!
//! Defines the configuration types every other fieldcraft crate consumes:
//! - [`FieldDefinition`]: one node of the recursive, typed field tree
//! - [`FieldType`]: the closed set of field types
//! - [`FieldGroup`]: a named bundle of root fields plus its location rules
//! - [`Rule`] / [`RuleGroup`]: assignment predicates (AND within a group, OR across groups)
//! - [`ContextDescriptor`]: what the rules are evaluated against
//! - [`validate_groups`]: authoring-time detection of name collisions
//!
//! Definitions are authored externally (JSON, TOML or code) and are read-only
//! to the engine.

mod group;
mod rule;
mod schema;
mod validate;

pub use group::{FieldGroup, RuleGroup};
pub use rule::{ContextDescriptor, Rule};
pub use schema::{FieldDefinition, FieldType, StyleHints, flatten_sections};
pub use validate::{SchemaIssue, validate_groups};
