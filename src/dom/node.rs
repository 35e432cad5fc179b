// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::dom::NodeId;

/// A node slot in the arena.
///
/// Attributes are nodes too. They hang off their owner element through
/// `attributes` and never appear in `children`.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node, `None` for the document node and detached nodes
    pub parent: Option<NodeId>,
    /// Child nodes in document order
    pub children: Vec<NodeId>,
    /// Attribute nodes (elements only)
    pub attributes: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Attribute { .. } => NodeKind::Attribute,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
        }
    }

    /// Element, attribute or processing-instruction name
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name } => Some(name),
            NodeData::Attribute { name, .. } => Some(name),
            NodeData::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }
}

/// Node-specific data
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Element { name: String },
    Attribute { name: String, value: String },
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

/// Coarse node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}
