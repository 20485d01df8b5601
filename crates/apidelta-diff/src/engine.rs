//! Entry point: match assemblies by name and diff each pair.
//!
//! Each assembly pair's tree diff is fully self-contained, so pairs run in
//! parallel. Results are merged into name-ordered maps afterward; output
//! ordering never depends on execution order. One failing pair is recorded
//! in the report's error map and does not abort the others.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, warn};

use apidelta_model::DeclarationNode;

use crate::error::DiffResult;
use crate::report::{DiffBody, Report};
use crate::tree_diff::{diff_pair, ChangeKind};

/// Diff two sets of assemblies, keyed by assembly name.
///
/// Assemblies present in both maps are diffed as matched pairs; assemblies
/// present on one side only are reported as wholly deleted or inserted.
/// Assemblies with an empty diff are omitted from the report.
pub fn compute_diff(
    before: &BTreeMap<String, DeclarationNode>,
    after: &BTreeMap<String, DeclarationNode>,
) -> Report {
    compute_diff_cancellable(before, after, &AtomicBool::new(false))
}

/// [`compute_diff`] with cooperative cancellation.
///
/// The flag is checked once per assembly pair, before the pair starts;
/// pairs already running complete normally. Cancelled pairs are simply
/// absent from the report.
pub fn compute_diff_cancellable(
    before: &BTreeMap<String, DeclarationNode>,
    after: &BTreeMap<String, DeclarationNode>,
    cancel: &AtomicBool,
) -> Report {
    let names: Vec<&String> = before
        .keys()
        .chain(after.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let results: Vec<(String, DiffResult<Option<DiffBody>>)> = names
        .into_par_iter()
        .filter_map(|name| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let before_root = before.get(name);
            let after_root = after.get(name);
            let change = match (before_root, after_root) {
                (Some(_), Some(_)) => ChangeKind::Unchanged,
                (Some(_), None) => ChangeKind::Deleted,
                (None, Some(_)) => ChangeKind::Inserted,
                (None, None) => return None,
            };
            debug!(assembly = %name, ?change, "diffing assembly pair");
            Some((name.clone(), diff_pair(before_root, after_root, change)))
        })
        .collect();

    let mut report = Report::new();
    for (name, result) in results {
        match result {
            Ok(Some(body)) if !body.is_empty() => {
                debug!(assembly = %name, lines = body.len(), "assembly differs");
                report.bodies.insert(name, body);
            }
            Ok(_) => {}
            Err(err) => {
                warn!(assembly = %name, error = %err, "assembly pair failed");
                report.errors.insert(name, err);
            }
        }
    }
    report
}
