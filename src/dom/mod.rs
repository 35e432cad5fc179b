// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Arena backed XML document model.
//!
//! Nodes live in a flat `Vec` inside a [`DomTree`] and refer to each other through
//! [`NodeId`] handles. Projections never hold pointers into the tree; they hold a
//! [`NodeRef`] (shared document handle + node id), and every mutation goes through an
//! explicit method on the tree.

mod document;
mod equality;
mod node;
mod tree;

pub use document::{Document, NodeRef};
pub use equality::{node_hash, nodes_are_equal};
pub use node::{Node, NodeData, NodeKind};
pub use tree::DomTree;

/// Node identifier: arena slot plus the generation of the node in that slot.
///
/// Slots of discarded nodes are reused; the generation makes an id of a
/// discarded node stop resolving instead of pointing at its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The document node of every tree
    pub const ROOT: NodeId = NodeId::new(0, 0);

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}
