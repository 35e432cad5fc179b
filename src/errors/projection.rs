// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top level error type for binding and invoking projections.

use thiserror::Error;

use super::{ConversionError, SelectorError, ValidationError};

/// Every failure a caller of the projector can observe.
///
/// Absence of matching nodes is never reported through this type; reads fall back to
/// the zero/absence value of their return type and deletes of nothing succeed.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// The interface failed bind-time validation. Nothing was bound.
    #[error("Invalid projection interface '{interface}': {}", join_errors(.errors))]
    InvalidInterface {
        interface: String,
        errors: Vec<ValidationError>,
    },

    /// Node text could not be converted, or a value could not be written.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The selector evaluator rejected an expression.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// After placeholder substitution the selector left the write-safe grammar.
    #[error("Selector '{selector}' is not usable for writing or deleting")]
    IllegalWriteSelector { selector: String },

    /// An argument was missing, of the wrong shape, or referenced a foreign node.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// The interface does not declare the invoked method.
    #[error("Projection interface '{interface}' has no method '{method}'")]
    UnknownMethod { interface: String, method: String },

    /// A delegated method has no mixin registered for its capability.
    #[error("No mixin registered for capability '{capability}' on projection '{interface}' (method '{method}')")]
    MixinMissing {
        interface: String,
        capability: String,
        method: String,
    },

    /// The document text could not be parsed.
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// A descriptor or config file could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error while reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for projector operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ProjectionError {
    /// Shorthand for an interface rejected for a single reason.
    pub fn invalid_interface(interface: &str, error: ValidationError) -> Self {
        ProjectionError::InvalidInterface {
            interface: interface.to_string(),
            errors: vec![error],
        }
    }
}
