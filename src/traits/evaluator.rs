// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::dom::{DomTree, NodeId};
use crate::errors::SelectorError;

/// Result of evaluating a selector expression.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    /// Matched nodes in document order, without duplicates
    NodeSet(Vec<NodeId>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl XPathValue {
    /// Matched nodes, empty for scalar results
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            XPathValue::NodeSet(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn is_node_set(&self) -> bool {
        matches!(self, XPathValue::NodeSet(_))
    }
}

/// Evaluates selector strings against a context node.
///
/// Placeholder substitution has already happened when `evaluate` is called; the
/// evaluator sees the final expression. Implementations must be deterministic,
/// the engine never retries.
pub trait SelectorEvaluator: Send + Sync {
    fn evaluate(
        &self,
        tree: &DomTree,
        context: NodeId,
        expression: &str,
    ) -> Result<XPathValue, SelectorError>;

    fn name(&self) -> &'static str;
}
