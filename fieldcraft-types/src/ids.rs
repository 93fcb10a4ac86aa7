//! Identifier types used throughout fieldcraft.
//!
//! Records, attachments and taxonomy terms are addressed by the host
//! platform's positive integer ids. Field keys are opaque strings that stay
//! stable when a field is renamed; new ones are minted from UUID v7.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw host id.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw host id.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Parses an id from its decimal form.
            pub fn parse(s: &str) -> crate::Result<Self> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

numeric_id! {
    /// Identifier of a content record (post, page, custom entry).
    RecordId
}

numeric_id! {
    /// Identifier of a media attachment in the Attachment Store.
    AttachmentId
}

numeric_id! {
    /// Identifier of a taxonomy term.
    TermId
}

/// Process-unique identity of a field definition.
///
/// Used for tree identity only. Storage is always addressed by the field's
/// `name`, never by its key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    /// Mints a new, time-ordered field key (`field_<uuid>`).
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("field_{}", Uuid::now_v7().simple()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
