// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors produced by a selector evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    /// The expression is not well formed.
    #[error("Syntax error in selector '{expression}' at offset {position}: {message}")]
    Syntax {
        expression: String,
        position: usize,
        message: String,
    },

    /// The expression calls a function the evaluator does not provide.
    #[error("Unknown selector function '{name}'")]
    UnknownFunction { name: String },

    /// A function was called with the wrong number of arguments.
    #[error("Function '{function}' expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },

    /// A path step was applied to something that is not a node-set.
    #[error("Selector '{expression}' does not evaluate to a node-set")]
    NotANodeSet { expression: String },

    /// The context node is not part of the tree handed to the evaluator.
    #[error("Invalid context node: {0}")]
    InvalidContext(String),
}
