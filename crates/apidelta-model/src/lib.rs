//! Declaration tree model for the apidelta API-surface diff engine.
//!
//! A library's public surface is described as a tree of declarations:
//! assemblies own namespaces, namespaces own types, types own members.
//! Trees are built once per version by an upstream extractor and consumed
//! read-only by the diff engine in `apidelta-diff`.
//!
//! # Key Types
//!
//! - [`DeclarationNode`] — One declaration, keyed by a version-stable identity
//! - [`DeclKind`] — Closed set of declaration kinds; containers vs. leaves
//! - [`Annotation`] — An attribute applied to a declaration, diffed separately
//!   from the declaration's own signature text

pub mod annotation;
pub mod declaration;
pub mod error;

pub use annotation::Annotation;
pub use declaration::{DeclKind, DeclarationNode};
pub use error::ModelError;
