use fieldcraft_types::FieldKey;
use serde::{Deserialize, Serialize};

/// The type of a field. Determines the shape of its stored and served value.
///
/// The set is closed: every consumer matches exhaustively, so adding a type
/// forces a decision in both the sanitize and the format path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Url,
    Boolean,
    Image,
    File,
    Gallery,
    Repeater,
    Group,
    /// Layout-only grouping. Has no stored value; its children are flattened
    /// into the parent's field set.
    Section,
}

impl FieldType {
    /// Types whose definitions carry `children`.
    pub fn has_children(self) -> bool {
        matches!(self, Self::Repeater | Self::Group | Self::Section)
    }

    /// Types whose stored form is a serialized structure rather than a scalar.
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Gallery | Self::Repeater | Self::Group)
    }

    /// Types that hold attachment references.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::File | Self::Gallery)
    }

    /// Whether values of this type are addressed in storage at all.
    pub fn is_stored(self) -> bool {
        !matches!(self, Self::Section)
    }
}

/// Display-only metadata. Never consulted by the codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleHints {
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default)]
    pub expanded: bool,
}

/// One node of the field schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Tree identity; stable across renames. Never used for storage.
    #[serde(default = "FieldKey::generate")]
    pub key: FieldKey,
    /// Storage address. Unique among siblings.
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub field_type: FieldType,
    /// Advisory only; writes are never rejected for missing values.
    #[serde(default)]
    pub required: bool,
    /// Substituted on read when the stored value is empty. Interpreted as a
    /// stored value of `field_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Row schema (repeater), nested object schema (group) or visually
    /// grouped fields (section). Ignored for every other type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDefinition>,
    #[serde(default)]
    pub style_hints: StyleHints,
}

impl FieldDefinition {
    /// Creates a definition with a freshly minted key and the name as label.
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            key: FieldKey::generate(),
            name: name.into(),
            label: name.into(),
            description: String::new(),
            field_type,
            required: false,
            default_value: None,
            children: Vec::new(),
            style_hints: StyleHints::default(),
        }
    }

    fn parent(name: &str, field_type: FieldType, children: Vec<FieldDefinition>) -> Self {
        Self {
            children,
            ..Self::new(name, field_type)
        }
    }

    /// Shorthand for a single-line text field.
    pub fn text(name: &str) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Shorthand for a multi-line text field.
    pub fn textarea(name: &str) -> Self {
        Self::new(name, FieldType::Textarea)
    }

    /// Shorthand for a numeric field.
    pub fn number(name: &str) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Shorthand for an email field.
    pub fn email(name: &str) -> Self {
        Self::new(name, FieldType::Email)
    }

    /// Shorthand for a URL field.
    pub fn url(name: &str) -> Self {
        Self::new(name, FieldType::Url)
    }

    /// Shorthand for a checkbox / true-false field.
    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Shorthand for a single image attachment.
    pub fn image(name: &str) -> Self {
        Self::new(name, FieldType::Image)
    }

    /// Shorthand for a single file attachment.
    pub fn file(name: &str) -> Self {
        Self::new(name, FieldType::File)
    }

    /// Shorthand for an ordered list of image attachments.
    pub fn gallery(name: &str) -> Self {
        Self::new(name, FieldType::Gallery)
    }

    /// Shorthand for a repeater whose rows follow `children`.
    pub fn repeater(name: &str, children: Vec<FieldDefinition>) -> Self {
        Self::parent(name, FieldType::Repeater, children)
    }

    /// Shorthand for a single nested object.
    pub fn group(name: &str, children: Vec<FieldDefinition>) -> Self {
        Self::parent(name, FieldType::Group, children)
    }

    /// Shorthand for a layout section.
    pub fn section(name: &str, children: Vec<FieldDefinition>) -> Self {
        Self::parent(name, FieldType::Section, children)
    }

    pub fn with_key(mut self, key: impl Into<FieldKey>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Children with any sections expanded in place, in declaration order.
    ///
    /// Empty for types that do not carry children.
    pub fn storage_children(&self) -> Vec<&FieldDefinition> {
        if !self.field_type.has_children() {
            return Vec::new();
        }
        flatten_sections(&self.children)
    }
}

/// Expands section definitions into their children, recursively.
///
/// The result holds only definitions that own a storage slot, in the order a
/// depth-first walk meets them.
pub fn flatten_sections(fields: &[FieldDefinition]) -> Vec<&FieldDefinition> {
    let mut out = Vec::with_capacity(fields.len());
    push_flattened(fields, &mut out);
    out
}

fn push_flattened<'a>(fields: &'a [FieldDefinition], out: &mut Vec<&'a FieldDefinition>) {
    for field in fields {
        if field.field_type == FieldType::Section {
            push_flattened(&field.children, out);
        } else {
            out.push(field);
        }
    }
}
