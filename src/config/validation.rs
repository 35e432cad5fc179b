//! Bind-time validation of projection interfaces.
//!
//! An interface is checked once, the first time it is bound. Validation is pure:
//! it looks only at the descriptor and reports every problem it finds instead of
//! stopping at the first one.
//!
//! # Validation Pipeline
//!
//! 1. **Type checks**: the name is not empty, the interface is public and it is an
//!    interface (not an annotation type or a class)
//! 2. **Method uniqueness**: dispatch is by name, so names must be unique
//! 3. **Per-method checks**: at most one of read/write/delete, reads return
//!    something, writes take a parameter, value markers are sane, and write/delete
//!    selectors are in the write-safe subset
//!
//! # Examples
//!
//! ```rust
//! use the_projector::config::{validate_projection_interface, MethodDescriptor, ProjectionInterface};
//! use the_projector::errors::ValidationError;
//! use the_projector::types::ValueType;
//!
//! let interface = ProjectionInterface::new("Book")
//!     .with_method(MethodDescriptor::new("getTitle").reading("//title"));
//!
//! match validate_projection_interface(&interface) {
//!     Ok(()) => unreachable!("a read without return type is rejected"),
//!     Err(errors) => {
//!         assert!(matches!(errors[0], ValidationError::ReadWithoutReturnType { .. }));
//!     }
//! }
//! ```

use std::collections::HashSet;

use crate::config::write_selector::is_legal_template_for_mutation;
use crate::config::{InterfaceKind, MethodDescriptor, MethodKind, ProjectionInterface};
use crate::errors::ValidationError;

/// Validates a projection interface for binding.
///
/// # Returns
///
/// * `Ok(())` - The interface can be bound
/// * `Err(Vec<ValidationError>)` - Every problem found, in declaration order
pub fn validate_projection_interface(
    interface: &ProjectionInterface,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(type_errors) = validate_interface_type(interface) {
        errors.extend(type_errors);
    }

    if let Err(duplicate_errors) = validate_unique_method_names(interface) {
        errors.extend(duplicate_errors);
    }

    for method in &interface.methods {
        if let Err(method_errors) = validate_method(&interface.name, method) {
            errors.extend(method_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_interface_type(interface: &ProjectionInterface) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let name = interface.name.clone();

    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyInterfaceName);
    }
    if !interface.public {
        errors.push(ValidationError::NotPublic {
            interface: name.clone(),
        });
    }
    match interface.kind {
        InterfaceKind::Interface => {}
        InterfaceKind::Annotation => errors.push(ValidationError::AnnotationType { interface: name }),
        InterfaceKind::Class => errors.push(ValidationError::NotAnInterface { interface: name }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_method_names(
    interface: &ProjectionInterface,
) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for method in &interface.methods {
        if !seen.insert(method.name.as_str()) {
            errors.push(ValidationError::DuplicateMethod {
                interface: interface.name.clone(),
                method: method.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_method(interface: &str, method: &MethodDescriptor) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let annotations = method.annotations();
    let ids = || (interface.to_string(), method.name.clone());

    if annotations.len() > 1 {
        let (interface, method) = ids();
        errors.push(ValidationError::ConflictingAnnotations {
            interface,
            method,
            kinds: annotations.iter().map(|(kind, _)| kind.as_str()).collect(),
        });
    }

    let kinds: Vec<MethodKind> = annotations.iter().map(|(kind, _)| *kind).collect();

    if kinds.contains(&MethodKind::Read) && method.returns.is_void() {
        let (interface, method) = ids();
        errors.push(ValidationError::ReadWithoutReturnType { interface, method });
    }

    if kinds.contains(&MethodKind::Write) && method.params.is_empty() {
        let (interface, method) = ids();
        errors.push(ValidationError::WriteWithoutParameters { interface, method });
    }

    let markers = method.params.iter().filter(|p| p.value).count();
    if markers > 1 {
        let (interface, method) = ids();
        errors.push(ValidationError::MultipleValueMarkers { interface, method });
    }
    if markers > 0 && !kinds.contains(&MethodKind::Write) {
        let (interface, method) = ids();
        errors.push(ValidationError::ValueMarkerOnNonWrite { interface, method });
    }

    for (kind, selector) in &annotations {
        if *kind != MethodKind::Read && !is_legal_template_for_mutation(selector) {
            let (interface, method) = ids();
            errors.push(ValidationError::IllegalWriteSelector {
                interface,
                method,
                selector: selector.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueType;

    fn book() -> ProjectionInterface {
        ProjectionInterface::new("Book")
            .with_method(
                MethodDescriptor::new("getTitle")
                    .reading("//title")
                    .returning(ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("setTitle")
                    .writing("/title")
                    .param("title", ValueType::String),
            )
            .with_method(MethodDescriptor::new("removeTitle").deleting("/title"))
    }

    #[test]
    fn test_valid_interface() {
        assert!(validate_projection_interface(&book()).is_ok());
    }

    #[test]
    fn test_invalid_interfaces_table_driven() {
        struct TestCase {
            name: &'static str,
            interface: ProjectionInterface,
            expected: ValidationError,
        }

        let test_cases = vec![
            TestCase {
                name: "private interface",
                interface: book().private(),
                expected: ValidationError::NotPublic {
                    interface: "Book".into(),
                },
            },
            TestCase {
                name: "annotation type",
                interface: book().with_kind(InterfaceKind::Annotation),
                expected: ValidationError::AnnotationType {
                    interface: "Book".into(),
                },
            },
            TestCase {
                name: "class",
                interface: book().with_kind(InterfaceKind::Class),
                expected: ValidationError::NotAnInterface {
                    interface: "Book".into(),
                },
            },
            TestCase {
                name: "read and write on one method",
                interface: ProjectionInterface::new("Book").with_method(
                    MethodDescriptor::new("title")
                        .reading("/title")
                        .writing("/title")
                        .param("t", ValueType::String)
                        .returning(ValueType::String),
                ),
                expected: ValidationError::ConflictingAnnotations {
                    interface: "Book".into(),
                    method: "title".into(),
                    kinds: vec!["read", "write"],
                },
            },
            TestCase {
                name: "read without return type",
                interface: ProjectionInterface::new("Book")
                    .with_method(MethodDescriptor::new("getTitle").reading("//title")),
                expected: ValidationError::ReadWithoutReturnType {
                    interface: "Book".into(),
                    method: "getTitle".into(),
                },
            },
            TestCase {
                name: "write without parameters",
                interface: ProjectionInterface::new("Book")
                    .with_method(MethodDescriptor::new("setTitle").writing("/title")),
                expected: ValidationError::WriteWithoutParameters {
                    interface: "Book".into(),
                    method: "setTitle".into(),
                },
            },
            TestCase {
                name: "two value markers",
                interface: ProjectionInterface::new("Book").with_method(
                    MethodDescriptor::new("setTitle")
                        .writing("/title")
                        .value_param("a", ValueType::String)
                        .value_param("b", ValueType::String),
                ),
                expected: ValidationError::MultipleValueMarkers {
                    interface: "Book".into(),
                    method: "setTitle".into(),
                },
            },
            TestCase {
                name: "value marker on a read",
                interface: ProjectionInterface::new("Book").with_method(
                    MethodDescriptor::new("getTitle")
                        .reading("/title[@lang='{0}']")
                        .value_param("lang", ValueType::String)
                        .returning(ValueType::String),
                ),
                expected: ValidationError::ValueMarkerOnNonWrite {
                    interface: "Book".into(),
                    method: "getTitle".into(),
                },
            },
            TestCase {
                name: "descendant selector on a write",
                interface: ProjectionInterface::new("Book").with_method(
                    MethodDescriptor::new("setTitle")
                        .writing("//title")
                        .param("t", ValueType::String),
                ),
                expected: ValidationError::IllegalWriteSelector {
                    interface: "Book".into(),
                    method: "setTitle".into(),
                    selector: "//title".into(),
                },
            },
            TestCase {
                name: "function call on a delete",
                interface: ProjectionInterface::new("Book")
                    .with_method(MethodDescriptor::new("clear").deleting("/a[last()]")),
                expected: ValidationError::IllegalWriteSelector {
                    interface: "Book".into(),
                    method: "clear".into(),
                    selector: "/a[last()]".into(),
                },
            },
            TestCase {
                name: "duplicate method",
                interface: book().with_method(
                    MethodDescriptor::new("getTitle")
                        .reading("/t")
                        .returning(ValueType::String),
                ),
                expected: ValidationError::DuplicateMethod {
                    interface: "Book".into(),
                    method: "getTitle".into(),
                },
            },
            TestCase {
                name: "empty name",
                interface: ProjectionInterface::new(""),
                expected: ValidationError::EmptyInterfaceName,
            },
        ];

        for test_case in test_cases {
            let errors = validate_projection_interface(&test_case.interface)
                .expect_err(test_case.name);
            assert!(
                errors.contains(&test_case.expected),
                "Test case '{}': expected {:?} in {:?}",
                test_case.name,
                test_case.expected,
                errors
            );
        }
    }

    #[test]
    fn test_errors_accumulate() {
        let interface = ProjectionInterface::new("Book")
            .private()
            .with_method(MethodDescriptor::new("a").reading("/a"))
            .with_method(MethodDescriptor::new("b").writing("//b"));
        let errors = validate_projection_interface(&interface).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
