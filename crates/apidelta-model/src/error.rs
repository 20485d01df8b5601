//! Error types for the model crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::declaration::DeclKind;

/// Errors produced while building declaration trees.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelError {
    /// A child was added to a declaration kind that holds no children.
    #[error("declaration '{identity}' of kind {kind} cannot hold children")]
    LeafCannotHoldChildren { kind: DeclKind, identity: String },

    /// Two children under the same parent share an identity.
    #[error("duplicate child identity '{child}' under '{parent}'")]
    DuplicateChild { parent: String, child: String },

    /// A declaration other than the root has no identity.
    #[error("declaration of kind {kind} is missing an identity")]
    MissingIdentity { kind: DeclKind },
}
