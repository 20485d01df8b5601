//! Annotations: attributes applied to a declaration.

use serde::{Deserialize, Serialize};

/// One attribute applied to a declaration.
///
/// The `identity` is derived from the attribute's type plus, when present,
/// its literal arguments, so repeated attributes of the same type with
/// different arguments stay distinct while argument-free repeats collapse
/// to a single entry. An annotation is owned entirely by its parent
/// declaration and never outlives it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Matching key, stable across versions.
    pub identity: String,
    /// Full textual form of the attribute.
    pub raw_text: String,
}

impl Annotation {
    /// Create an annotation from a pre-computed identity and its text.
    pub fn new(identity: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Derive the identity from an attribute type and optional literal
    /// arguments, then build the annotation.
    pub fn from_parts(attr_type: &str, arguments: Option<&str>, raw_text: impl Into<String>) -> Self {
        let identity = match arguments {
            Some(args) => format!("{attr_type}({args})"),
            None => attr_type.to_string(),
        };
        Self::new(identity, raw_text)
    }
}
