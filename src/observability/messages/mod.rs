// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human readable line and
//! [`StructuredLog`] for the structured `tracing` event.
//!
//! # Organization
//!
//! * `binding` - Interface registration, validation and projection creation
//! * `invocation` - Method dispatch, writes, deletes and conversions
//! * `mixin` - Mixin registration and delegation
//! * `document` - Document parsing and file I/O
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_projector::observability::messages::invocation::InvocationStarted;
//! use the_projector::observability::messages::StructuredLog;
//!
//! let msg = InvocationStarted {
//!     interface: "Book",
//!     method: "getTitle",
//!     operation: "read",
//!     argument_count: 0,
//! };
//!
//! let span = msg.span("invocation");
//! let _guard = span.enter();
//! msg.log();
//! ```

use tracing::Span;

pub mod binding;
pub mod document;
pub mod invocation;
pub mod mixin;

/// A log message that knows its level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event at its level
    fn log(&self);

    /// Build a span carrying the message's fields
    fn span(&self, name: &str) -> Span;
}
