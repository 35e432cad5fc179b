// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for interface registration, validation and projection creation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Interface descriptor registered with a projector.
///
/// # Log Level
/// `debug!` - Configuration detail
///
/// # Example
/// ```
/// use the_projector::observability::messages::binding::InterfaceRegistered;
///
/// let msg = InterfaceRegistered {
///     interface: "Book",
///     method_count: 3,
///     replaced: false,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct InterfaceRegistered<'a> {
    pub interface: &'a str,
    pub method_count: usize,
    pub replaced: bool,
}

impl Display for InterfaceRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let verb = if self.replaced { "Replaced" } else { "Registered" };
        write!(
            f,
            "{} projection interface '{}' with {} methods",
            verb, self.interface, self.method_count
        )
    }
}

impl StructuredLog for InterfaceRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            interface = self.interface,
            method_count = self.method_count,
            replaced = self.replaced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "interface_registration",
            span_name = name,
            interface = self.interface,
        )
    }
}

/// Interface validated and its dispatch table built.
///
/// # Log Level
/// `debug!` - Happens once per interface
pub struct InterfaceBound<'a> {
    pub interface: &'a str,
    pub operation_count: usize,
}

impl Display for InterfaceBound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Bound projection interface '{}' ({} operations)",
            self.interface, self.operation_count
        )
    }
}

impl StructuredLog for InterfaceBound<'_> {
    fn log(&self) {
        tracing::debug!(
            interface = self.interface,
            operation_count = self.operation_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "interface_binding",
            span_name = name,
            interface = self.interface,
            operation_count = self.operation_count,
        )
    }
}

/// Interface failed bind-time validation.
///
/// # Log Level
/// `error!` - The caller's descriptor is wrong
///
/// # Example
/// ```
/// use the_projector::observability::messages::binding::InterfaceRejected;
///
/// let msg = InterfaceRejected {
///     interface: "Book",
///     error_count: 2,
///     errors: "Interface 'Book' is not public; 'Book' is not an interface",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct InterfaceRejected<'a> {
    pub interface: &'a str,
    pub error_count: usize,
    pub errors: &'a str,
}

impl Display for InterfaceRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Projection interface '{}' rejected with {} errors: {}",
            self.interface, self.error_count, self.errors
        )
    }
}

impl StructuredLog for InterfaceRejected<'_> {
    fn log(&self) {
        tracing::error!(
            interface = self.interface,
            error_count = self.error_count,
            errors = self.errors,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "interface_binding",
            span_name = name,
            interface = self.interface,
            error_count = self.error_count,
        )
    }
}

/// Projection created over a node.
///
/// # Log Level
/// `trace!` - Happens for every bind and every sub-projection read
pub struct ProjectionCreated<'a> {
    pub interface: &'a str,
    pub node_kind: &'a str,
}

impl Display for ProjectionCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Created projection '{}' over {} node",
            self.interface, self.node_kind
        )
    }
}

impl StructuredLog for ProjectionCreated<'_> {
    fn log(&self) {
        tracing::trace!(
            interface = self.interface,
            node_kind = self.node_kind,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "projection",
            span_name = name,
            interface = self.interface,
            node_kind = self.node_kind,
        )
    }
}
