// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural node equality.
//!
//! Document implementations do not guarantee stable identity for structurally
//! identical subtrees, so projections compare their bound nodes by structure:
//! same kind, same name, same value, the same attribute set (order ignored) and
//! pairwise equal children. [`node_hash`] is consistent with [`nodes_are_equal`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::dom::{DomTree, NodeData, NodeId};

/// Structural equality of `a` in `tree_a` and `b` in `tree_b`
pub fn nodes_are_equal(tree_a: &DomTree, a: NodeId, tree_b: &DomTree, b: NodeId) -> bool {
    let (Some(node_a), Some(node_b)) = (tree_a.get(a), tree_b.get(b)) else {
        return false;
    };
    if node_a.data != node_b.data {
        return false;
    }
    if sorted_attributes(tree_a, a) != sorted_attributes(tree_b, b) {
        return false;
    }
    let children_a = tree_a.children(a);
    let children_b = tree_b.children(b);
    children_a.len() == children_b.len()
        && children_a
            .iter()
            .zip(children_b)
            .all(|(ca, cb)| nodes_are_equal(tree_a, *ca, tree_b, *cb))
}

/// Hash of the node's structure
pub fn node_hash(tree: &DomTree, id: NodeId) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_into(tree, id, &mut hasher);
    hasher.finish()
}

fn hash_into(tree: &DomTree, id: NodeId, hasher: &mut DefaultHasher) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => 0u8.hash(hasher),
        NodeData::Element { name } => {
            1u8.hash(hasher);
            name.hash(hasher);
        }
        NodeData::Attribute { name, value } => {
            2u8.hash(hasher);
            name.hash(hasher);
            value.hash(hasher);
        }
        NodeData::Text(t) => {
            3u8.hash(hasher);
            t.hash(hasher);
        }
        NodeData::Comment(c) => {
            4u8.hash(hasher);
            c.hash(hasher);
        }
        NodeData::ProcessingInstruction { target, data } => {
            5u8.hash(hasher);
            target.hash(hasher);
            data.hash(hasher);
        }
    }
    sorted_attributes(tree, id).hash(hasher);
    for child in tree.children(id) {
        hash_into(tree, *child, hasher);
    }
}

fn sorted_attributes(tree: &DomTree, id: NodeId) -> Vec<(&str, &str)> {
    let mut attrs: Vec<(&str, &str)> = tree
        .attributes(id)
        .iter()
        .filter_map(|a| match tree.get(*a).map(|n| &n.data) {
            Some(NodeData::Attribute { name, value }) => Some((name.as_str(), value.as_str())),
            _ => None,
        })
        .collect();
    attrs.sort_unstable();
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(attr_order: &[(&str, &str)], text: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let e = tree.create_element("item");
        for (k, v) in attr_order {
            tree.set_attribute(e, k, v);
        }
        let t = tree.create_text(text);
        tree.append_child(e, t);
        tree.append_child(tree.root(), e);
        (tree, e)
    }

    #[test]
    fn test_equal_structure_in_different_trees() {
        let (a, ea) = build(&[("x", "1"), ("y", "2")], "hi");
        let (b, eb) = build(&[("y", "2"), ("x", "1")], "hi");
        assert!(nodes_are_equal(&a, ea, &b, eb));
        assert_eq!(node_hash(&a, ea), node_hash(&b, eb));
        assert!(nodes_are_equal(&a, NodeId::ROOT, &b, NodeId::ROOT));
    }

    #[test]
    fn test_different_text_is_unequal() {
        let (a, ea) = build(&[], "hi");
        let (b, eb) = build(&[], "ho");
        assert!(!nodes_are_equal(&a, ea, &b, eb));
    }

    #[test]
    fn test_different_attribute_value_is_unequal() {
        let (a, ea) = build(&[("x", "1")], "hi");
        let (b, eb) = build(&[("x", "2")], "hi");
        assert!(!nodes_are_equal(&a, ea, &b, eb));
    }
}
