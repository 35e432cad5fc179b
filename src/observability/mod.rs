// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging of the projector. Message types follow a struct-based pattern with a
//! `Display` implementation (the human readable line) and a [`messages::StructuredLog`]
//! implementation (the `tracing` event with structured fields, emitted at the
//! message's level).
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::binding` - Interface registration, validation and projection creation
//! * `messages::invocation` - Method dispatch, writes, deletes and conversions
//! * `messages::mixin` - Mixin registration and delegation
//! * `messages::document` - Document parsing and file I/O
//!
//! # Usage
//!
//! ```rust
//! use the_projector::observability::messages::binding::InterfaceRejected;
//! use the_projector::observability::messages::StructuredLog;
//!
//! let msg = InterfaceRejected {
//!     interface: "Book",
//!     error_count: 1,
//!     errors: "Interface 'Book' is not public",
//! };
//!
//! msg.log();
//! ```

pub mod messages;
