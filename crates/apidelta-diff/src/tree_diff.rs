//! Tree-level diff: recursive identity-based matching of declaration trees.
//!
//! Matching is by identity, never by position: a child pairs up only when
//! both sides hold the same identity *and* the same kind. A same-identity,
//! different-kind pair is reported as a deletion plus an insertion, since
//! no meaningful signature diff exists across kinds.
//!
//! # Invariants
//!
//! - Input trees are never mutated; pairing state lives in a per-call
//!   consumed set.
//! - Output ordering follows [`sibling_order`](crate::order::sibling_order)
//!   regardless of input map iteration order.
//! - Contract violations (a leaf holding children, a missing identity, a
//!   nested assembly) fail the whole subtree fast instead of producing a
//!   best-effort render.

use std::collections::{BTreeMap, BTreeSet};

use apidelta_model::{DeclKind, DeclarationNode};

use crate::attr_diff::diff_annotations;
use crate::error::{DiffError, DiffResult};
use crate::line_diff::{diff_lines, tag_all};
use crate::order::ordered_children;
use crate::render;
use crate::report::{DiffBody, DiffTag};

/// The change mode a parent establishes for a subtree.
///
/// Threaded down the recursion unmodified: inside a wholly inserted
/// container every descendant is inserted, and likewise for deletions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// The container exists on both sides; only its contents may differ.
    Unchanged,
    /// The container exists only in the after version.
    Inserted,
    /// The container exists only in the before version.
    Deleted,
}

/// Diff one container pair and return its rendered body.
///
/// `before` and `after` are the two versions of the same container; at most
/// one may be absent. Returns `None` only when nothing differs at all (own
/// signature, own annotations, and children alike) and the parent change
/// mode is [`ChangeKind::Unchanged`]. Assembly roots come back unwrapped;
/// every other container is wrapped in its opening and closing lines by
/// [`render::wrap`], with a changed signature rendered as a removed-old,
/// added-new opening pair.
pub fn diff_pair(
    before: Option<&DeclarationNode>,
    after: Option<&DeclarationNode>,
    change: ChangeKind,
) -> DiffResult<Option<DiffBody>> {
    DiffFrame {
        before,
        after,
        change,
    }
    .run()
}

/// One recursion frame: the pair being diffed and the parent's change mode.
struct DiffFrame<'a> {
    before: Option<&'a DeclarationNode>,
    after: Option<&'a DeclarationNode>,
    change: ChangeKind,
}

impl<'a> DiffFrame<'a> {
    fn run(&self) -> DiffResult<Option<DiffBody>> {
        let container = self.after.or(self.before).ok_or(DiffError::EmptyPair)?;
        if !container.kind.allows_children() {
            return Err(DiffError::NotAContainer {
                kind: container.kind,
                identity: container.identity.clone(),
            });
        }

        let annotation_body = diff_annotations(self.before, self.after)?;
        let signature_changed = match (self.before, self.after) {
            (Some(b), Some(a)) => b.raw_text != a.raw_text,
            _ => false,
        };

        let empty = BTreeMap::new();
        let after_children = self.after.map(|n| &n.children).unwrap_or(&empty);

        let mut body: DiffBody = Vec::new();
        let mut consumed: BTreeSet<&str> = BTreeSet::new();

        // Pass 1: every before child, in sibling order. Matches are diffed
        // in place, the rest are wholly deleted.
        if let Some(before_node) = self.before {
            for before_child in ordered_children(before_node) {
                check_identity(container, before_child)?;
                match after_children.get(&before_child.identity) {
                    Some(after_child) if after_child.kind == before_child.kind => {
                        consumed.insert(before_child.identity.as_str());
                        matched_child(before_child, after_child, &mut body)?;
                    }
                    _ => lone_child(before_child, ChangeKind::Deleted, &mut body)?,
                }
            }
        }

        // Pass 2: after children not already paired, in sibling order.
        if let Some(after_node) = self.after {
            for after_child in ordered_children(after_node) {
                if consumed.contains(after_child.identity.as_str()) {
                    continue;
                }
                check_identity(container, after_child)?;
                lone_child(after_child, ChangeKind::Inserted, &mut body)?;
            }
        }

        if body.is_empty()
            && annotation_body.is_none()
            && !signature_changed
            && self.change == ChangeKind::Unchanged
        {
            return Ok(None);
        }

        let mut out = annotation_body.unwrap_or_default();
        if container.kind == DeclKind::Assembly {
            // Assembly roots render no opening line, so there is nothing
            // to hang a signature change on.
            out.extend(body);
            return Ok(if out.is_empty() { None } else { Some(out) });
        }
        let opening = match (signature_changed, self.before) {
            (true, Some(before_node)) => render::Opening::Changed {
                old: &before_node.raw_text,
                new: &container.raw_text,
            },
            _ => render::Opening::Same(&container.raw_text),
        };
        out.extend(render::wrap(body, container, opening, self.change)?);
        Ok(Some(out))
    }
}

/// Diff a child present on both sides with matching kind.
fn matched_child(
    before_child: &DeclarationNode,
    after_child: &DeclarationNode,
    body: &mut DiffBody,
) -> DiffResult<()> {
    match before_child.kind {
        DeclKind::Namespace | DeclKind::Type => {
            if let Some(sub) =
                diff_pair(Some(before_child), Some(after_child), ChangeKind::Unchanged)?
            {
                body.extend(sub);
            }
        }
        DeclKind::Assembly => {
            return Err(DiffError::Unrenderable {
                kind: DeclKind::Assembly,
                identity: before_child.identity.clone(),
            });
        }
        DeclKind::Delegate | DeclKind::Member | DeclKind::EnumMember => {
            leaf_guard(before_child)?;
            leaf_guard(after_child)?;
            let annotations = diff_annotations(Some(before_child), Some(after_child))?;
            if before_child.raw_text != after_child.raw_text {
                if let Some(ann) = annotations {
                    body.extend(ann);
                }
                body.extend(diff_lines(&before_child.raw_text, &after_child.raw_text));
            } else if let Some(ann) = annotations {
                // Signature untouched: anchor it, as context, under its
                // changed annotations.
                body.extend(ann);
                body.extend(tag_all(&after_child.raw_text, DiffTag::Context));
            }
        }
    }
    Ok(())
}

/// Diff a child present on only one side: wholly inserted or deleted.
fn lone_child(
    child: &DeclarationNode,
    change: ChangeKind,
    body: &mut DiffBody,
) -> DiffResult<()> {
    let (before, after, tag) = match change {
        ChangeKind::Deleted => (Some(child), None, DiffTag::Removed),
        ChangeKind::Inserted => (None, Some(child), DiffTag::Added),
        ChangeKind::Unchanged => unreachable!("lone children are never unchanged"),
    };

    match child.kind {
        DeclKind::Namespace | DeclKind::Type => {
            if let Some(sub) = diff_pair(before, after, change)? {
                body.extend(sub);
            }
        }
        DeclKind::Assembly => {
            return Err(DiffError::Unrenderable {
                kind: DeclKind::Assembly,
                identity: child.identity.clone(),
            });
        }
        DeclKind::Delegate | DeclKind::Member | DeclKind::EnumMember => {
            leaf_guard(child)?;
            if let Some(ann) = diff_annotations(before, after)? {
                body.extend(ann);
            }
            body.extend(tag_all(&child.raw_text, tag));
        }
    }
    Ok(())
}

fn check_identity(parent: &DeclarationNode, child: &DeclarationNode) -> DiffResult<()> {
    if child.identity.is_empty() {
        return Err(DiffError::MissingIdentity {
            kind: child.kind,
            parent: parent.identity.clone(),
        });
    }
    Ok(())
}

fn leaf_guard(node: &DeclarationNode) -> DiffResult<()> {
    if !node.children.is_empty() {
        return Err(DiffError::LeafWithChildren {
            kind: node.kind,
            identity: node.identity.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DiffUnit;

    fn assembly(children: Vec<DeclarationNode>) -> DeclarationNode {
        let mut root = DeclarationNode::new(DeclKind::Assembly, "Lib", "");
        for child in children {
            root.add_child(child).unwrap();
        }
        root
    }

    fn namespace(name: &str, children: Vec<DeclarationNode>) -> DeclarationNode {
        let mut ns =
            DeclarationNode::new(DeclKind::Namespace, name, format!("namespace {name}"));
        for child in children {
            ns.add_child(child).unwrap();
        }
        ns
    }

    fn class(identity: &str, name: &str, children: Vec<DeclarationNode>) -> DeclarationNode {
        let mut ty =
            DeclarationNode::new(DeclKind::Type, identity, format!("public class {name}"));
        for child in children {
            ty.add_child(child).unwrap();
        }
        ty
    }

    fn member(identity: &str, raw: &str) -> DeclarationNode {
        DeclarationNode::new(DeclKind::Member, identity, raw)
    }

    #[test]
    fn identical_pair_yields_none() {
        let tree = assembly(vec![namespace(
            "N",
            vec![class("N.C", "C", vec![member("M()", "public void M()")])],
        )]);
        let result = diff_pair(Some(&tree), Some(&tree), ChangeKind::Unchanged).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn empty_pair_is_an_error() {
        assert_eq!(
            diff_pair(None, None, ChangeKind::Unchanged),
            Err(DiffError::EmptyPair)
        );
    }

    #[test]
    fn leaf_cannot_anchor_a_pair() {
        let leaf = member("M()", "void M()");
        let err = diff_pair(Some(&leaf), Some(&leaf), ChangeKind::Unchanged).unwrap_err();
        assert!(matches!(err, DiffError::NotAContainer { .. }));
    }

    #[test]
    fn member_signature_change_diffs_in_place() {
        let before = assembly(vec![namespace(
            "N",
            vec![class("N.C", "C", vec![member("F()", "public int F()")])],
        )]);
        let after = assembly(vec![namespace(
            "N",
            vec![class("N.C", "C", vec![member("F()", "public long F()")])],
        )]);

        let body = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged)
            .unwrap()
            .unwrap();
        let expected = vec![
            DiffUnit::context("namespace N {"),
            DiffUnit::context("    public class C {"),
            DiffUnit::removed("        public int F()"),
            DiffUnit::added("        public long F()"),
            DiffUnit::context("    }"),
            DiffUnit::context("}"),
        ];
        assert_eq!(body, expected);
    }

    #[test]
    fn container_signature_change_renders_old_and_new() {
        let before = assembly(vec![namespace("N", vec![class("N.C", "C", vec![])])]);
        let sealed = DeclarationNode::new(DeclKind::Type, "N.C", "public sealed class C");
        let after = assembly(vec![namespace("N", vec![sealed])]);

        let body = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged)
            .unwrap()
            .unwrap();
        let expected = vec![
            DiffUnit::context("namespace N {"),
            DiffUnit::removed("    public class C {"),
            DiffUnit::added("    public sealed class C {"),
            DiffUnit::context("    }"),
            DiffUnit::context("}"),
        ];
        assert_eq!(body, expected);
    }

    #[test]
    fn kind_mismatch_is_delete_plus_insert() {
        // Same identity "N.X", but a type became a namespace.
        let before = assembly(vec![namespace(
            "N",
            vec![class("N.X", "X", vec![])],
        )]);
        let after = assembly(vec![namespace("N", vec![namespace("N.X", vec![])])]);

        let body = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged)
            .unwrap()
            .unwrap();
        let expected = vec![
            DiffUnit::context("namespace N {"),
            DiffUnit::removed("    public class X {"),
            DiffUnit::removed("    }"),
            DiffUnit::added("    namespace N.X {"),
            DiffUnit::added("    }"),
            DiffUnit::context("}"),
        ];
        assert_eq!(body, expected);
    }

    #[test]
    fn deleted_container_reports_nested_deletions_individually() {
        let before = assembly(vec![namespace(
            "N",
            vec![class("N.C", "C", vec![member("M()", "public void M()")])],
        )]);

        let body = diff_pair(Some(&before), None, ChangeKind::Deleted)
            .unwrap()
            .unwrap();
        assert!(body.iter().all(|u| u.tag == DiffTag::Removed));
        assert!(body.iter().any(|u| u.text.contains("public void M()")));
    }

    #[test]
    fn inserted_empty_container_still_renders_wrapper() {
        let after = assembly(vec![namespace("N", vec![])]);
        let body = diff_pair(None, Some(&after), ChangeKind::Inserted)
            .unwrap()
            .unwrap();
        assert_eq!(
            body,
            vec![DiffUnit::added("namespace N {"), DiffUnit::added("}")]
        );
    }

    #[test]
    fn annotation_only_container_change_wraps_as_context() {
        use apidelta_model::Annotation;

        let before = assembly(vec![namespace("N", vec![class("N.C", "C", vec![])])]);
        let mut after_class = class("N.C", "C", vec![]);
        after_class.annotations.push(Annotation::new("Flags", "[Flags]"));
        let after = assembly(vec![namespace("N", vec![after_class])]);

        let body = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged)
            .unwrap()
            .unwrap();
        let expected = vec![
            DiffUnit::context("namespace N {"),
            DiffUnit::added("    [Flags]"),
            DiffUnit::context("    public class C {"),
            DiffUnit::context("    }"),
            DiffUnit::context("}"),
        ];
        assert_eq!(body, expected);
    }

    #[test]
    fn leaf_with_children_fails_fast() {
        let mut bad_member = member("M()", "void M()");
        bad_member
            .children
            .insert("X".to_string(), member("X", "void X()"));
        let mut ty = class("N.C", "C", vec![]);
        ty.children.insert("M()".to_string(), bad_member);
        let before = assembly(vec![namespace("N", vec![ty.clone()])]);
        let after = assembly(vec![namespace("N", vec![])]);

        let err = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged).unwrap_err();
        assert!(matches!(err, DiffError::LeafWithChildren { .. }));
    }

    #[test]
    fn nested_assembly_is_unrenderable() {
        let mut ns = namespace("N", vec![]);
        ns.children.insert(
            "Inner".to_string(),
            DeclarationNode::new(DeclKind::Assembly, "Inner", ""),
        );
        let before = assembly(vec![]);
        let mut after = assembly(vec![]);
        after.children.insert("N".to_string(), ns);

        let err = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Unrenderable {
                kind: DeclKind::Assembly,
                ..
            }
        ));
    }

    #[test]
    fn missing_child_identity_fails_fast() {
        let mut ns = namespace("N", vec![]);
        ns.children
            .insert(String::new(), member("", "void M()"));
        let after = assembly(vec![]);
        let mut before = assembly(vec![]);
        before.children.insert("N".to_string(), ns);

        let err = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged).unwrap_err();
        assert!(matches!(err, DiffError::MissingIdentity { .. }));
    }

    #[test]
    fn inputs_survive_repeated_calls_unchanged() {
        let before = assembly(vec![namespace(
            "N",
            vec![class("N.C", "C", vec![member("F()", "int F()")])],
        )]);
        let after = assembly(vec![namespace("N", vec![])]);
        let before_copy = before.clone();
        let after_copy = after.clone();

        let first = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged).unwrap();
        let second = diff_pair(Some(&before), Some(&after), ChangeKind::Unchanged).unwrap();
        assert_eq!(first, second);
        assert_eq!(before, before_copy);
        assert_eq!(after, after_copy);
    }
}
