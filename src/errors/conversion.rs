// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while converting between node text and declared value types.

use thiserror::Error;

/// Failure to turn node text into a declared value type, or a value into node text.
///
/// Conversion errors are surfaced to the caller of the projection method. They are
/// never swallowed, and a failed write conversion happens before the tree is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The text could not be parsed as the declared target type.
    #[error("Cannot convert '{text}' to {target}")]
    Unparsable { text: String, target: String },

    /// The text does not name a variant of the declared enumeration.
    #[error("'{variant}' is not a variant of enum {enum_name}")]
    UnknownEnumVariant { enum_name: String, variant: String },

    /// No conversion is known for the declared type.
    #[error("No conversion registered for type {0}")]
    UnsupportedType(String),

    /// The value cannot be written to a node.
    #[error("Cannot write {value_kind} value: {reason}")]
    UnsupportedValue { value_kind: String, reason: String },

    /// A registered custom conversion rejected its input.
    #[error("Custom conversion for {type_name} failed: {reason}")]
    Custom { type_name: String, reason: String },
}
