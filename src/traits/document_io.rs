// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::dom::{DomTree, NodeId};
use crate::errors::ProjectionError;

/// Turns document text into a tree.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<DomTree, ProjectionError>;
}

/// Renders a node (and its subtree) as document text.
pub trait DocumentSerializer: Send + Sync {
    fn render(&self, tree: &DomTree, node: NodeId) -> String;
}
