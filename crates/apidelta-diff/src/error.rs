//! Error types for the diff engine.
//!
//! Errors are contract violations, not recoverable conditions: the diff is
//! deterministic and pure, so nothing is retried. One failing assembly pair
//! never aborts the others; the engine records the error per assembly in
//! the [`Report`](crate::report::Report) and keeps going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use apidelta_model::{DeclKind, ModelError};

/// Errors that can occur while diffing a declaration tree pair.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffError {
    /// Both sides of a diff pair were absent.
    #[error("both sides of the diff pair are absent")]
    EmptyPair,

    /// A declaration below the root has no identity to match on.
    #[error("a {kind} declaration under '{parent}' is missing its identity")]
    MissingIdentity { kind: DeclKind, parent: String },

    /// A leaf-kind declaration holds children.
    #[error("leaf declaration '{identity}' of kind {kind} holds children")]
    LeafWithChildren { kind: DeclKind, identity: String },

    /// A child diff was requested on a kind that holds no children.
    #[error("declaration '{identity}' of kind {kind} cannot anchor a child diff")]
    NotAContainer { kind: DeclKind, identity: String },

    /// An unsupported kind reached the renderer's container wrapping.
    #[error("kind {kind} cannot be rendered as a wrapping container ('{identity}')")]
    Unrenderable { kind: DeclKind, identity: String },

    /// Tree construction failed upstream.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
