// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for document parsing and file I/O.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Document text parsed into a tree.
///
/// # Log Level
/// `debug!` - Routine
pub struct DocumentParsed<'a> {
    pub interface: &'a str,
    pub bytes: usize,
    pub nodes: usize,
}

impl Display for DocumentParsed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Parsed {} bytes into {} nodes for projection '{}'",
            self.bytes, self.nodes, self.interface
        )
    }
}

impl StructuredLog for DocumentParsed<'_> {
    fn log(&self) {
        tracing::debug!(
            interface = self.interface,
            bytes = self.bytes,
            nodes = self.nodes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("parse", span_name = name, interface = self.interface)
    }
}

/// Document read from or written to a file.
///
/// # Log Level
/// `info!` - Touches the file system
///
/// # Example
/// ```
/// use the_projector::observability::messages::document::DocumentFileAccess;
///
/// let msg = DocumentFileAccess {
///     path: "/tmp/books.xml",
///     operation: "read",
///     bytes: 512,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DocumentFileAccess<'a> {
    pub path: &'a str,
    pub operation: &'a str,
    pub bytes: usize,
}

impl Display for DocumentFileAccess<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let direction = if self.operation == "write" { "to" } else { "from" };
        write!(
            f,
            "Document {} ({} bytes) {} '{}'",
            self.operation, self.bytes, direction, self.path
        )
    }
}

impl StructuredLog for DocumentFileAccess<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            operation = self.operation,
            bytes = self.bytes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "document_io",
            span_name = name,
            path = self.path,
            operation = self.operation,
        )
    }
}
