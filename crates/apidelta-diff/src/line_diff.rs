//! Line-level text diff: wraps the `similar` crate (Myers algorithm).
//!
//! Declaration and annotation texts are short, so the full change sequence
//! is kept, including Context runs for unchanged lines; hunk grouping is
//! not needed.

use similar::{ChangeTag, TextDiff};

use crate::report::{DiffTag, DiffUnit};

/// Diff two raw-text blocks line by line.
///
/// Returns one [`DiffUnit`] per line. Identical inputs come back entirely
/// as Context lines.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffUnit> {
    if old == new {
        return tag_all(new, DiffTag::Context);
    }

    let text_diff = TextDiff::from_lines(old, new);
    text_diff
        .iter_all_changes()
        .map(|change| {
            let text = change.value().trim_end_matches('\n').to_string();
            match change.tag() {
                ChangeTag::Equal => DiffUnit::context(text),
                ChangeTag::Delete => DiffUnit::removed(text),
                ChangeTag::Insert => DiffUnit::added(text),
            }
        })
        .collect()
}

/// Render a whole raw-text block under a single tag.
///
/// Used for wholly added or removed declarations, and for unchanged leaf
/// text that still has to appear as Context under its changed annotations.
pub fn tag_all(text: &str, tag: DiffTag) -> Vec<DiffUnit> {
    text.lines().map(|line| DiffUnit::new(line, tag)).collect()
}
