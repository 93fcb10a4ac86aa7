use crate::rule::Rule;
use crate::schema::FieldDefinition;
use serde::{Deserialize, Deserializer, Serialize};

/// A conjunction of rules. Never empty: construction and deserialization
/// both refuse an empty rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleGroup {
    rules: Vec<Rule>,
}

impl RuleGroup {
    /// Builds a rule group, or `None` when `rules` is empty.
    pub fn new(rules: Vec<Rule>) -> Option<Self> {
        if rules.is_empty() {
            None
        } else {
            Some(Self { rules })
        }
    }

    /// A rule group holding one rule.
    pub fn single(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A named, ordered bundle of root field definitions plus the rule groups
/// deciding where it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Disjunction of rule groups. Empty groups are dropped on load; a field
    /// group with none left never applies.
    #[serde(default, deserialize_with = "non_empty_rule_groups")]
    location: Vec<RuleGroup>,
    /// Inactive groups never apply.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn non_empty_rule_groups<'de, D>(deserializer: D) -> Result<Vec<RuleGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let groups = Vec::<RuleGroup>::deserialize(deserializer)?;
    Ok(groups.into_iter().filter(|g| !g.is_empty()).collect())
}

impl FieldGroup {
    /// Creates an active group with no location rules.
    pub fn new(key: &str, title: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            fields,
            location: Vec::new(),
            active: true,
        }
    }

    /// Adds a rule group (OR-ed with the existing ones).
    pub fn with_rule_group(mut self, group: RuleGroup) -> Self {
        self.location.push(group);
        self
    }

    /// Adds a rule group built from `rules`. An empty list is dropped.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        if let Some(group) = RuleGroup::new(rules) {
            self.location.push(group);
        }
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn rule_groups(&self) -> &[RuleGroup] {
        &self.location
    }
}
