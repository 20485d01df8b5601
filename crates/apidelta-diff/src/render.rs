//! Rendering: container wrapping and report-entry formatting.
//!
//! Wrapping synthesizes a container's opening and closing lines (its raw
//! text with an opening brace, and the matching closing brace) around an
//! already-diffed child body. Assembly roots are never wrapped; their
//! children's concatenated body is the final output.

use apidelta_model::{DeclKind, DeclarationNode};

use crate::error::{DiffError, DiffResult};
use crate::report::{DiffBody, DiffTag, DiffUnit};
use crate::tree_diff::ChangeKind;

const INDENT: &str = "    ";

/// The opening text for a wrapped container.
#[derive(Clone, Copy, Debug)]
pub enum Opening<'a> {
    /// The signature is the same on both sides; the opening lines carry
    /// the tag implied by the change mode.
    Same(&'a str),
    /// The signature itself changed: the old opening lines render as
    /// Removed, the new ones as Added.
    Changed { old: &'a str, new: &'a str },
}

/// Wrap a diffed child body with its container's opening and closing lines.
///
/// The wrapper lines carry the tag implied by `change`: Context for a
/// container present on both sides, Added or Removed for a wholly inserted
/// or deleted one. A [`Opening::Changed`] container renders both versions
/// of its opening line while the closing brace stays on the change-mode
/// tag. The child body keeps its own tags and is indented one level. Only
/// namespaces and types can wrap; anything else reaching here is an
/// upstream error.
pub fn wrap(
    child_body: DiffBody,
    container: &DeclarationNode,
    opening: Opening<'_>,
    change: ChangeKind,
) -> DiffResult<DiffBody> {
    match container.kind {
        DeclKind::Namespace | DeclKind::Type => {}
        kind => {
            return Err(DiffError::Unrenderable {
                kind,
                identity: container.identity.clone(),
            })
        }
    }

    let tag = match change {
        ChangeKind::Unchanged => DiffTag::Context,
        ChangeKind::Inserted => DiffTag::Added,
        ChangeKind::Deleted => DiffTag::Removed,
    };

    let mut out = Vec::with_capacity(child_body.len() + 2);
    match opening {
        Opening::Same(text) => push_opening(&mut out, text, tag),
        Opening::Changed { old, new } => {
            push_opening(&mut out, old, DiffTag::Removed);
            push_opening(&mut out, new, DiffTag::Added);
        }
    }

    for unit in child_body {
        out.push(DiffUnit::new(indent(&unit.text), unit.tag));
    }
    out.push(DiffUnit::new("}", tag));

    Ok(out)
}

/// Push a container's opening lines under one tag.
///
/// The raw text may span several lines (base lists, constraints); the
/// brace goes on the last one.
fn push_opening(out: &mut DiffBody, text: &str, tag: DiffTag) {
    let lines: Vec<&str> = text.lines().collect();
    match lines.split_last() {
        Some((last, head)) => {
            for line in head {
                out.push(DiffUnit::new(*line, tag));
            }
            out.push(DiffUnit::new(format!("{last} {{"), tag));
        }
        None => out.push(DiffUnit::new("{", tag)),
    }
}

fn indent(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("{INDENT}{text}")
    }
}

/// Format one report entry: assembly name header plus a fenced diff block.
pub fn render_entry(name: &str, body: &DiffBody) -> String {
    let mut out = String::new();
    out.push_str("## ");
    out.push_str(name);
    out.push_str("\n\n```diff\n");
    for unit in body {
        out.push_str(&unit.prefixed());
        out.push('\n');
    }
    out.push_str("```\n");
    out
}
