use fieldcraft_types::{RecordId, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single assignment predicate over a [`ContextDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "param", rename_all = "snake_case")]
pub enum Rule {
    /// Matches when the context's content type equals `content_type`.
    ContentType { content_type: String },
    /// Matches one specific record.
    SpecificRecord { record_id: RecordId },
    /// Matches a template identifier. `"default"` is a literal, not a wildcard.
    Template { template_id: String },
    /// Matches when the record carries `term_id` in `taxonomy`.
    TaxonomyTerm { taxonomy: String, term_id: TermId },
    /// Matches an options page by key.
    OptionsPage { page_key: String },
}

impl Rule {
    pub fn content_type(content_type: &str) -> Self {
        Self::ContentType {
            content_type: content_type.into(),
        }
    }

    pub fn record(record_id: RecordId) -> Self {
        Self::SpecificRecord { record_id }
    }

    pub fn template(template_id: &str) -> Self {
        Self::Template {
            template_id: template_id.into(),
        }
    }

    pub fn taxonomy_term(taxonomy: &str, term_id: TermId) -> Self {
        Self::TaxonomyTerm {
            taxonomy: taxonomy.into(),
            term_id,
        }
    }

    pub fn options_page(page_key: &str) -> Self {
        Self::OptionsPage {
            page_key: page_key.into(),
        }
    }
}

/// Everything assignment rules may look at when deciding where a field group
/// applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub taxonomy_terms: HashMap<String, HashSet<TermId>>,
    /// Set only for options-page contexts; record contexts leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_page: Option<String>,
}

impl ContextDescriptor {
    /// Context for a content record of the given type.
    pub fn for_record(record_id: RecordId, content_type: &str) -> Self {
        Self {
            content_type: Some(content_type.into()),
            record_id: Some(record_id),
            ..Self::default()
        }
    }

    /// Context for a singleton options page.
    pub fn for_options_page(page_key: &str) -> Self {
        Self {
            options_page: Some(page_key.into()),
            ..Self::default()
        }
    }

    pub fn with_template(mut self, template_id: &str) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_terms(mut self, taxonomy: &str, terms: impl IntoIterator<Item = TermId>) -> Self {
        self.taxonomy_terms
            .entry(taxonomy.into())
            .or_default()
            .extend(terms);
        self
    }

    /// Whether the context carries `term_id` under `taxonomy`.
    pub fn has_term(&self, taxonomy: &str, term_id: TermId) -> bool {
        self.taxonomy_terms
            .get(taxonomy)
            .is_some_and(|terms| terms.contains(&term_id))
    }
}
