//! Annotation-set diff for a single declaration pair.
//!
//! Annotations match across versions by identity. The output keeps the
//! before side's source order: removed and changed annotations first, then
//! any after-only annotations in their own source order.
//!
//! Known limitation: two annotations with the same identity (same type and
//! identical literal arguments) collapse to one matching entry, so a change
//! in the number of such duplicates is invisible to the diff.

use std::collections::{BTreeMap, BTreeSet};

use apidelta_model::{Annotation, DeclarationNode};

use crate::error::{DiffError, DiffResult};
use crate::line_diff::{diff_lines, tag_all};
use crate::report::{DiffBody, DiffTag};

/// Diff the annotation sets of one declaration pair.
///
/// At most one side may be absent (a wholly added or removed declaration).
/// Returns `None` when the sets are textually identical; otherwise a body
/// holding the removed, changed, and added annotation lines. Matched but
/// unchanged annotations render as Context so the changed ones keep their
/// anchor. Never mutates either node.
pub fn diff_annotations(
    before: Option<&DeclarationNode>,
    after: Option<&DeclarationNode>,
) -> DiffResult<Option<DiffBody>> {
    const EMPTY: &[Annotation] = &[];
    let (before_anns, after_anns) = match (before, after) {
        (None, None) => return Err(DiffError::EmptyPair),
        (Some(b), Some(a)) => (b.annotations.as_slice(), a.annotations.as_slice()),
        (Some(b), None) => (b.annotations.as_slice(), EMPTY),
        (None, Some(a)) => (EMPTY, a.annotations.as_slice()),
    };

    // Later duplicates overwrite earlier ones, mirroring the identity
    // collapse described above.
    let after_by_id: BTreeMap<&str, &Annotation> = after_anns
        .iter()
        .map(|ann| (ann.identity.as_str(), ann))
        .collect();

    let mut body: DiffBody = Vec::new();
    let mut changed = false;
    let mut seen_before: BTreeSet<&str> = BTreeSet::new();

    for ann in before_anns {
        if !seen_before.insert(ann.identity.as_str()) {
            continue;
        }
        match after_by_id.get(ann.identity.as_str()) {
            Some(after_ann) => {
                if ann.raw_text == after_ann.raw_text {
                    body.extend(tag_all(&after_ann.raw_text, DiffTag::Context));
                } else {
                    changed = true;
                    body.extend(diff_lines(&ann.raw_text, &after_ann.raw_text));
                }
            }
            None => {
                changed = true;
                body.extend(tag_all(&ann.raw_text, DiffTag::Removed));
            }
        }
    }

    let mut seen_after: BTreeSet<&str> = BTreeSet::new();
    for ann in after_anns {
        if !seen_after.insert(ann.identity.as_str()) {
            continue;
        }
        if seen_before.contains(ann.identity.as_str()) {
            continue;
        }
        changed = true;
        body.extend(tag_all(&ann.raw_text, DiffTag::Added));
    }

    Ok(if changed { Some(body) } else { None })
}
