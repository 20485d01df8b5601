//! Sibling ordering: the total order applied to declarations at render time.
//!
//! Input children maps carry no meaningful order, so this order is imposed
//! once per container while rendering, guaranteeing deterministic output
//! regardless of map iteration order.

use std::cmp::Ordering;

use apidelta_model::{DeclKind, DeclarationNode};

/// Total order over sibling declarations.
///
/// Enum members both carrying a numeric value compare numerically (with
/// identity as the tie-break); everything else compares by identity,
/// byte-lexicographic and case-sensitive.
pub fn sibling_order(a: &DeclarationNode, b: &DeclarationNode) -> Ordering {
    if a.kind == DeclKind::EnumMember && b.kind == DeclKind::EnumMember {
        if let (Some(av), Some(bv)) = (a.ordering_value, b.ordering_value) {
            return av.cmp(&bv).then_with(|| a.identity.cmp(&b.identity));
        }
    }
    a.identity.cmp(&b.identity)
}

/// A node's children in rendering order.
pub fn ordered_children(node: &DeclarationNode) -> Vec<&DeclarationNode> {
    let mut children: Vec<&DeclarationNode> = node.children.values().collect();
    children.sort_by(|a, b| sibling_order(a, b));
    children
}
