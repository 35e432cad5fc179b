// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::{Flag, ProjectionInterface};
use crate::dom::{node_hash, nodes_are_equal, Document, NodeKind, NodeRef};
use crate::engine::dispatch::DispatchTable;
use crate::engine::invocation;
use crate::engine::Projector;
use crate::errors::ProjectionResult;
use crate::types::Value;

/// An interface bound to a document or element node.
///
/// All state lives in the document; a projection only holds the node handle, the
/// interface's dispatch table and the projector that created it. Two projections
/// are equal when they project the same interface onto structurally equal nodes,
/// whatever documents those nodes live in.
#[derive(Clone)]
pub struct Projection {
    table: Arc<DispatchTable>,
    node: NodeRef,
    projector: Projector,
}

impl Projection {
    pub(crate) fn new(table: Arc<DispatchTable>, node: NodeRef, projector: Projector) -> Self {
        Self {
            table,
            node,
            projector,
        }
    }

    /// Invoke a projection method by name.
    pub fn invoke(&self, method: &str, args: &[Value]) -> ProjectionResult<Value> {
        invocation::invoke(self, method, args)
    }

    /// Invoke a method that takes no arguments.
    pub fn get(&self, method: &str) -> ProjectionResult<Value> {
        self.invoke(method, &[])
    }

    pub fn interface_name(&self) -> &str {
        self.table.interface_name()
    }

    pub fn projection_interface(&self) -> &ProjectionInterface {
        self.table.interface()
    }

    /// Node this projection is bound to
    pub fn dom_node(&self) -> &NodeRef {
        &self.node
    }

    pub fn owner_document(&self) -> &Document {
        self.node.document()
    }

    /// Document element for document projections, the bound element otherwise.
    pub fn base_element(&self) -> Option<NodeRef> {
        match self.node.kind()? {
            NodeKind::Document => self.owner_document().document_element(),
            _ => Some(self.node.clone()),
        }
    }

    /// Bound node rendered as XML
    pub fn as_string(&self) -> String {
        self.projector.render(&self.node)
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub(crate) fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Hash of the interface name and the bound node's structure, consistent
    /// with `==`.
    pub fn structural_hash(&self) -> u64 {
        let tree = self.owner_document().read();
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.interface_name().hash(&mut hasher);
        node_hash(&tree, self.node.id()).hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        if self.interface_name() != other.interface_name() {
            return false;
        }
        if self.node == other.node {
            return true;
        }
        let ours = self.owner_document();
        let theirs = other.owner_document();
        if ours.ptr_eq(theirs) {
            let tree = ours.read();
            return nodes_are_equal(&tree, self.node.id(), &tree, other.node.id());
        }
        // guards are always taken in document key order
        if ours.key() < theirs.key() {
            let tree_a = ours.read();
            let tree_b = theirs.read();
            nodes_are_equal(&tree_a, self.node.id(), &tree_b, other.node.id())
        } else {
            let tree_b = theirs.read();
            let tree_a = ours.read();
            nodes_are_equal(&tree_a, self.node.id(), &tree_b, other.node.id())
        }
    }
}

impl Eq for Projection {}

impl Hash for Projection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structural_hash().hash(state);
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.projector.has_flag(Flag::ToStringRendersXml) {
            return f.write_str(&self.as_string());
        }
        match self.node.kind() {
            Some(NodeKind::Document) | None => {
                write!(f, "Projection [{}] to document", self.interface_name())
            }
            _ => write!(
                f,
                "Projection [{}] to element '{}'",
                self.interface_name(),
                self.node.name().unwrap_or_default()
            ),
        }
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("interface", &self.interface_name())
            .field("node", &self.node)
            .finish()
    }
}
