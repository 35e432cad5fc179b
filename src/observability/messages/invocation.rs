// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for projection method dispatch.
//!
//! This module contains message types for logging events related to:
//! * Method dispatch (identity, read, write, delete)
//! * Tree mutations performed by writes and deletes
//! * Value conversion failures

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A projection method was invoked.
///
/// # Log Level
/// `trace!` - Every call
///
/// # Example
/// ```
/// use the_projector::observability::messages::invocation::InvocationStarted;
///
/// let msg = InvocationStarted {
///     interface: "Book",
///     method: "setTitle",
///     operation: "write",
///     argument_count: 1,
/// };
///
/// tracing::trace!("{}", msg);
/// ```
pub struct InvocationStarted<'a> {
    pub interface: &'a str,
    pub method: &'a str,
    pub operation: &'a str,
    pub argument_count: usize,
}

impl Display for InvocationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Invoking {} method '{}.{}' with {} arguments",
            self.operation, self.interface, self.method, self.argument_count
        )
    }
}

impl StructuredLog for InvocationStarted<'_> {
    fn log(&self) {
        tracing::trace!(
            interface = self.interface,
            method = self.method,
            operation = self.operation,
            argument_count = self.argument_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "invocation",
            span_name = name,
            interface = self.interface,
            method = self.method,
            operation = self.operation,
        )
    }
}

/// A projection method returned an error.
///
/// # Log Level
/// `debug!` - The error is returned to the caller, who decides how loud it is
pub struct InvocationFailed<'a> {
    pub interface: &'a str,
    pub method: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for InvocationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Method '{}.{}' failed: {}",
            self.interface, self.method, self.error
        )
    }
}

impl StructuredLog for InvocationFailed<'_> {
    fn log(&self) {
        tracing::debug!(
            interface = self.interface,
            method = self.method,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "invocation",
            span_name = name,
            interface = self.interface,
            method = self.method,
        )
    }
}

/// A write found no target and created it.
///
/// # Log Level
/// `debug!` - Structural change to the document
///
/// # Example
/// ```
/// use the_projector::observability::messages::invocation::WritePathCreated;
///
/// let msg = WritePathCreated {
///     selector: "/library/book/title",
///     created_elements: 2,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct WritePathCreated<'a> {
    pub selector: &'a str,
    pub created_elements: usize,
}

impl Display for WritePathCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created missing write target '{}' ({} new elements)",
            self.selector, self.created_elements
        )
    }
}

impl StructuredLog for WritePathCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            selector = self.selector,
            created_elements = self.created_elements,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("write_path", span_name = name, selector = self.selector)
    }
}

/// A delete detached nodes.
///
/// # Log Level
/// `debug!` - Structural change to the document
pub struct NodesDeleted<'a> {
    pub selector: &'a str,
    pub count: usize,
}

impl Display for NodesDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deleted {} nodes matching '{}'", self.count, self.selector)
    }
}

impl StructuredLog for NodesDeleted<'_> {
    fn log(&self) {
        tracing::debug!(selector = self.selector, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("delete", span_name = name, selector = self.selector)
    }
}

/// Node text could not be converted into the declared type.
///
/// # Log Level
/// `warn!` - Document content does not match the interface
pub struct ConversionFailed<'a> {
    pub method: &'a str,
    pub target: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ConversionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Method '{}' could not convert to {}: {}",
            self.method, self.target, self.error
        )
    }
}

impl StructuredLog for ConversionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            method = self.method,
            target_type = self.target,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "conversion",
            span_name = name,
            method = self.method,
            target_type = self.target,
        )
    }
}
