//! Declaration nodes: one node per API declaration.
//!
//! A [`DeclarationNode`] is an immutable snapshot of one declaration in a
//! library's public surface. Containers (assemblies, namespaces, types) own
//! their children in a map keyed by identity; insertion order carries no
//! meaning, ordering is reimposed at render time by the diff engine.
//!
//! # Invariants
//!
//! - Every child's `identity` is unique within its parent's `children` map.
//! - Only container kinds hold children.
//! - `raw_text` excludes both children and annotations, so it can be diffed
//!   independently of either.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::ModelError;

/// The closed set of declaration kinds.
///
/// A declaration's kind must match across versions for the two sides to be
/// treated as the same declaration; a same-identity, different-kind pair is
/// diffed as a deletion plus an insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    /// A compilation-unit root. Never wrapped in the rendered diff.
    Assembly,
    Namespace,
    Type,
    Delegate,
    Member,
    /// An enum field. Siblings order by numeric value, not identity.
    EnumMember,
}

impl DeclKind {
    /// Returns `true` for kinds that may own children.
    pub fn allows_children(self) -> bool {
        matches!(self, DeclKind::Assembly | DeclKind::Namespace | DeclKind::Type)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclKind::Assembly => "assembly",
            DeclKind::Namespace => "namespace",
            DeclKind::Type => "type",
            DeclKind::Delegate => "delegate",
            DeclKind::Member => "member",
            DeclKind::EnumMember => "enum member",
        };
        f.write_str(name)
    }
}

/// One declaration in a public API surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclarationNode {
    /// What kind of declaration this is.
    pub kind: DeclKind,
    /// Version-stable key, unique among siblings. Derived upstream from the
    /// fully-qualified signature, so overloads stay distinct.
    pub identity: String,
    /// The declaration's self-contained textual form, excluding children
    /// and annotations.
    pub raw_text: String,
    /// Numeric sibling-ordering value. Only meaningful for enum members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering_value: Option<i64>,
    /// Attributes applied to this declaration, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Child declarations, keyed by identity. Empty for leaf kinds.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, DeclarationNode>,
}

impl DeclarationNode {
    /// Create a childless declaration.
    pub fn new(kind: DeclKind, identity: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            kind,
            identity: identity.into(),
            raw_text: raw_text.into(),
            ordering_value: None,
            annotations: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Create an enum member carrying its numeric ordering value.
    pub fn enum_member(
        identity: impl Into<String>,
        raw_text: impl Into<String>,
        value: i64,
    ) -> Self {
        let mut node = Self::new(DeclKind::EnumMember, identity, raw_text);
        node.ordering_value = Some(value);
        node
    }

    /// Attach an annotation (builder style).
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Returns `true` if this node's kind may own children.
    pub fn is_container(&self) -> bool {
        self.kind.allows_children()
    }

    /// Add a child declaration, keyed by its identity.
    ///
    /// Fails if this node is a leaf kind, the child has no identity, or a
    /// sibling with the same identity already exists.
    pub fn add_child(&mut self, child: DeclarationNode) -> Result<(), ModelError> {
        if !self.kind.allows_children() {
            return Err(ModelError::LeafCannotHoldChildren {
                kind: self.kind,
                identity: self.identity.clone(),
            });
        }
        if child.identity.is_empty() {
            return Err(ModelError::MissingIdentity { kind: child.kind });
        }
        if self.children.contains_key(&child.identity) {
            return Err(ModelError::DuplicateChild {
                parent: self.identity.clone(),
                child: child.identity,
            });
        }
        self.children.insert(child.identity.clone(), child);
        Ok(())
    }

    /// Add a child declaration (builder style).
    pub fn with_child(mut self, child: DeclarationNode) -> Result<Self, ModelError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Recursively check the tree invariants.
    ///
    /// Useful after deserializing a snapshot, where the [`add_child`]
    /// checks never ran.
    ///
    /// [`add_child`]: DeclarationNode::add_child
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.children.is_empty() && !self.kind.allows_children() {
            return Err(ModelError::LeafCannotHoldChildren {
                kind: self.kind,
                identity: self.identity.clone(),
            });
        }
        for child in self.children.values() {
            if child.identity.is_empty() {
                return Err(ModelError::MissingIdentity { kind: child.kind });
            }
            child.validate()?;
        }
        Ok(())
    }
}
