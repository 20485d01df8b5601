//! Diff output types: tagged lines, bodies, and the per-assembly report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DiffError;
use crate::render;

/// How one output line relates to the before/after versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiffTag {
    /// Present only in the after version.
    Added,
    /// Present only in the before version.
    Removed,
    /// Present in both; rendered unmarked.
    Context,
}

impl DiffTag {
    /// Swap `Added` and `Removed`; `Context` is its own inverse.
    pub fn inverse(self) -> Self {
        match self {
            DiffTag::Added => DiffTag::Removed,
            DiffTag::Removed => DiffTag::Added,
            DiffTag::Context => DiffTag::Context,
        }
    }
}

/// One tagged output line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffUnit {
    pub text: String,
    pub tag: DiffTag,
}

impl DiffUnit {
    pub fn new(text: impl Into<String>, tag: DiffTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self::new(text, DiffTag::Added)
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(text, DiffTag::Removed)
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::new(text, DiffTag::Context)
    }

    /// The line with its unified-diff prefix, trailing whitespace trimmed.
    pub fn prefixed(&self) -> String {
        let prefix = match self.tag {
            DiffTag::Added => "+  ",
            DiffTag::Removed => "-  ",
            DiffTag::Context => "   ",
        };
        format!("{prefix}{}", self.text).trim_end().to_string()
    }
}

/// An ordered sequence of tagged lines: one rendered diff region.
pub type DiffBody = Vec<DiffUnit>;

/// The outcome of diffing two sets of assemblies.
///
/// `bodies` holds an entry only for assemblies that actually differ;
/// `errors` holds the pairs that failed a contract check. Each assembly
/// appears in at most one of the two maps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Rendered diff body per changed assembly.
    pub bodies: BTreeMap<String, DiffBody>,
    /// Contract violations per failed assembly pair.
    pub errors: BTreeMap<String, DiffError>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no assembly differed and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty() && self.errors.is_empty()
    }

    /// Returns `true` if any assembly pair failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Render one assembly's entry: header plus fenced diff block.
    pub fn render_entry(&self, name: &str) -> Option<String> {
        self.bodies
            .get(name)
            .map(|body| render::render_entry(name, body))
    }

    /// Render every changed assembly's entry, in name order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (name, body) in &self.bodies {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&render::render_entry(name, body));
        }
        out
    }
}
