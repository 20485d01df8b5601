//! Semantic API-surface diff engine.
//!
//! Given two versions of a library's public surface as
//! [`DeclarationNode`](apidelta_model::DeclarationNode) trees, computes
//! which declarations were added, removed, or modified, and renders the
//! result as a unified diff that preserves the original nesting structure
//! (unchanged containers appear as opening/closing context lines).
//!
//! # Key Types
//!
//! - [`compute_diff`] / [`compute_diff_cancellable`] -- The engine entry point
//! - [`Report`] -- Per-assembly diff bodies plus per-assembly errors
//! - [`DiffBody`] / [`DiffUnit`] / [`DiffTag`] -- Tagged output lines
//! - [`diff_pair`] / [`ChangeKind`] -- Single-pair tree diff, for callers
//!   that orchestrate their own pairing

pub mod attr_diff;
pub mod engine;
pub mod error;
pub mod line_diff;
pub mod order;
pub mod render;
pub mod report;
pub mod tree_diff;

pub use attr_diff::diff_annotations;
pub use engine::{compute_diff, compute_diff_cancellable};
pub use error::{DiffError, DiffResult};
pub use line_diff::diff_lines;
pub use order::{ordered_children, sibling_order};
pub use report::{DiffBody, DiffTag, DiffUnit, Report};
pub use tree_diff::{diff_pair, ChangeKind};
