// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for mixin registration and delegation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Mixin registered for a projection interface.
///
/// # Log Level
/// `info!` - Changes the behavior of every projection of the interface
///
/// # Example
/// ```
/// use the_projector::observability::messages::mixin::MixinRegistered;
///
/// let capabilities = vec!["Comparable".to_string()];
/// let msg = MixinRegistered {
///     interface: "Event",
///     capabilities: &capabilities,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct MixinRegistered<'a> {
    pub interface: &'a str,
    pub capabilities: &'a [String],
}

impl Display for MixinRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered mixin for '{}' under capabilities [{}]",
            self.interface,
            self.capabilities.join(", ")
        )
    }
}

impl StructuredLog for MixinRegistered<'_> {
    fn log(&self) {
        tracing::info!(
            interface = self.interface,
            capabilities = ?self.capabilities,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("mixin", span_name = name, interface = self.interface)
    }
}

/// Mixin removed from a projection interface.
///
/// # Log Level
/// `info!` - Changes the behavior of every projection of the interface
pub struct MixinRemoved<'a> {
    pub interface: &'a str,
    pub capability: &'a str,
}

impl Display for MixinRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed mixin for '{}' capability '{}'",
            self.interface, self.capability
        )
    }
}

impl StructuredLog for MixinRemoved<'_> {
    fn log(&self) {
        tracing::info!(
            interface = self.interface,
            capability = self.capability,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "mixin",
            span_name = name,
            interface = self.interface,
            capability = self.capability,
        )
    }
}

/// Call delegated to a mixin.
///
/// # Log Level
/// `debug!` - Every delegated call
pub struct MixinDelegated<'a> {
    pub interface: &'a str,
    pub method: &'a str,
    pub capability: &'a str,
}

impl Display for MixinDelegated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Delegating '{}.{}' to mixin for '{}'",
            self.interface, self.method, self.capability
        )
    }
}

impl StructuredLog for MixinDelegated<'_> {
    fn log(&self) {
        tracing::debug!(
            interface = self.interface,
            method = self.method,
            capability = self.capability,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "mixin",
            span_name = name,
            interface = self.interface,
            method = self.method,
            capability = self.capability,
        )
    }
}
