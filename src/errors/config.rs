// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Reasons a projection interface is rejected at bind time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The projector does not know an interface with this name
    UnknownInterface {
        interface: String,
    },
    /// The descriptor has an empty name
    EmptyInterfaceName,
    /// Only public interfaces can be projected
    NotPublic {
        interface: String,
    },
    /// The descriptor describes a class rather than an interface
    NotAnInterface {
        interface: String,
    },
    /// The descriptor describes an annotation type
    AnnotationType {
        interface: String,
    },
    /// Two methods share a name, so dispatch by name would be ambiguous
    DuplicateMethod {
        interface: String,
        method: String,
    },
    /// A method carries more than one of read/write/delete
    ConflictingAnnotations {
        interface: String,
        method: String,
        kinds: Vec<&'static str>,
    },
    /// A read method declares no return type
    ReadWithoutReturnType {
        interface: String,
        method: String,
    },
    /// A write method declares no parameters
    WriteWithoutParameters {
        interface: String,
        method: String,
    },
    /// More than one parameter is marked as the value to write
    MultipleValueMarkers {
        interface: String,
        method: String,
    },
    /// A value marker appears on a method that does not write
    ValueMarkerOnNonWrite {
        interface: String,
        method: String,
    },
    /// A write or delete selector is outside the write-safe grammar
    IllegalWriteSelector {
        interface: String,
        method: String,
        selector: String,
    },
    /// A read result or written value has a type the projector cannot convert
    UnconvertibleType {
        interface: String,
        method: String,
        ty: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownInterface { interface } => {
                write!(f, "Unknown projection interface '{}'", interface)
            }
            ValidationError::EmptyInterfaceName => {
                write!(f, "Projection interface name must not be empty")
            }
            ValidationError::NotPublic { interface } => {
                write!(f, "Interface '{}' is not public", interface)
            }
            ValidationError::NotAnInterface { interface } => {
                write!(f, "'{}' is not an interface", interface)
            }
            ValidationError::AnnotationType { interface } => {
                write!(
                    f,
                    "'{}' is an annotation type. Remove the @ and try again",
                    interface
                )
            }
            ValidationError::DuplicateMethod { interface, method } => {
                write!(
                    f,
                    "Method '{}' is declared more than once in '{}'",
                    method, interface
                )
            }
            ValidationError::ConflictingAnnotations {
                interface,
                method,
                kinds,
            } => {
                write!(
                    f,
                    "Method '{}.{}' has too many annotations ({}). Decide for one of read, write, or delete",
                    interface,
                    method,
                    kinds.join(", ")
                )
            }
            ValidationError::ReadWithoutReturnType { interface, method } => {
                write!(
                    f,
                    "Method '{}.{}' reads but has no return type",
                    interface, method
                )
            }
            ValidationError::WriteWithoutParameters { interface, method } => {
                write!(
                    f,
                    "Method '{}.{}' writes but has no parameter",
                    interface, method
                )
            }
            ValidationError::MultipleValueMarkers { interface, method } => {
                write!(
                    f,
                    "Method '{}.{}' marks more than one parameter as the value",
                    interface, method
                )
            }
            ValidationError::ValueMarkerOnNonWrite { interface, method } => {
                write!(
                    f,
                    "Method '{}.{}' is not a writing method, but marks a parameter as the value",
                    interface, method
                )
            }
            ValidationError::IllegalWriteSelector {
                interface,
                method,
                selector,
            } => {
                write!(
                    f,
                    "Method '{}.{}' uses selector '{}' which cannot be used to write or delete",
                    interface, method, selector
                )
            }
            ValidationError::UnconvertibleType {
                interface,
                method,
                ty,
            } => {
                write!(
                    f,
                    "Method '{}.{}' uses type '{}' which has no registered conversion",
                    interface, method, ty
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
