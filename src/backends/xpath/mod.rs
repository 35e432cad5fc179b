// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Default selector evaluator: a pragmatic XPath 1.0 subset.
//!
//! Supported: absolute and relative location paths, `//`, `.`, `..`, `@attr`, `*`,
//! the `text()`, `node()` and `comment()` tests, the common axes, positional and
//! boolean predicates, comparisons, `and`/`or`, arithmetic (`+ - * div mod`),
//! unions and the core string/number/node-set functions. Namespaces, variables and
//! the remaining functions are not supported.
//!
//! Parsed expressions are cached by their final (substituted) text.

mod eval;
mod functions;
mod lexer;
mod parser;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::consts::SELECTOR_CACHE_CAPACITY;
use crate::dom::{DomTree, NodeId};
use crate::errors::SelectorError;
use crate::traits::{SelectorEvaluator, XPathValue};

pub use eval::number_to_string;

/// Evaluates selectors against a [`DomTree`].
#[derive(Default)]
pub struct PathEvaluator {
    cache: RwLock<HashMap<String, Arc<parser::Expr>>>,
}

impl PathEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, expression: &str) -> Result<Arc<parser::Expr>, SelectorError> {
        if let Some(expr) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(expression)
        {
            return Ok(Arc::clone(expr));
        }
        let expr = Arc::new(parser::parse(expression)?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= SELECTOR_CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(expression.to_string(), Arc::clone(&expr));
        Ok(expr)
    }
}

impl SelectorEvaluator for PathEvaluator {
    fn evaluate(
        &self,
        tree: &DomTree,
        context: NodeId,
        expression: &str,
    ) -> Result<XPathValue, SelectorError> {
        if !tree.contains(context) {
            return Err(SelectorError::InvalidContext(format!(
                "node {:?} is not part of the tree",
                context
            )));
        }
        let expr = self.compile(expression)?;
        eval::evaluate(&expr, &eval::Context::new(tree, context))
    }

    fn name(&self) -> &'static str {
        "path"
    }
}
