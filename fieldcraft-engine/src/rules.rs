//! Assignment rule evaluation.
//!
//! A [`RuleGroup`] is a conjunction, a field group's rule groups form a
//! disjunction. Neither fold relies on its identity element: an empty rule
//! group never matches, and a field group without rule groups never applies.

use fieldcraft_model::{ContextDescriptor, FieldGroup, Rule, RuleGroup};

/// Whether a single rule holds for `ctx`.
pub fn matches(rule: &Rule, ctx: &ContextDescriptor) -> bool {
    match rule {
        Rule::ContentType { content_type } => ctx.content_type.as_deref() == Some(content_type.as_str()),
        Rule::SpecificRecord { record_id } => ctx.record_id == Some(*record_id),
        Rule::Template { template_id } => ctx.template_id.as_deref() == Some(template_id.as_str()),
        Rule::TaxonomyTerm { taxonomy, term_id } => ctx.has_term(taxonomy, *term_id),
        Rule::OptionsPage { page_key } => ctx.options_page.as_deref() == Some(page_key.as_str()),
    }
}

/// Whether every rule of the group holds.
pub fn group_matches(group: &RuleGroup, ctx: &ContextDescriptor) -> bool {
    !group.is_empty() && group.rules().iter().all(|rule| matches(rule, ctx))
}

/// Whether any of the field group's rule groups matches.
pub fn field_group_applies(field_group: &FieldGroup, ctx: &ContextDescriptor) -> bool {
    field_group.active
        && field_group
            .rule_groups()
            .iter()
            .any(|group| group_matches(group, ctx))
}
