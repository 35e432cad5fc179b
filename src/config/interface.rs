// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::types::{Value, ValueType};
use crate::utils::format_placeholders;

/// Declarative description of a projection interface.
///
/// This is what gets bound to a document: a named set of methods, each optionally
/// annotated with a read, write or delete selector. Descriptors are built in code
/// with the builder methods below or loaded from YAML/TOML.
///
/// # Fields
/// * `name` - Interface name, also the dispatch-table cache key
/// * `public` - Only public interfaces can be projected (defaults to true)
/// * `kind` - Must be `interface` to be projected
/// * `extends` - Capability interfaces this interface extends; mixins are registered against these
/// * `document_origin` - Optional location template for the backing document
/// * `methods` - Method descriptors, dispatched by name
///
/// # Example
/// ```yaml
/// name: Event
/// extends: [Comparable]
/// methods:
///   - name: getTitle
///     read: //e2eventtitle
///     returns: string
///   - name: setTitle
///     write: /e2event/e2eventtitle
///     params:
///       - { name: title, type: string }
///     returns: projection<Event>
///   - name: compareTo
///     declared_by: Comparable
///     params:
///       - { name: other, type: projection<Event> }
///     returns: int
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInterface {
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub kind: InterfaceKind,
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub document_origin: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

fn default_public() -> bool {
    true
}

/// What kind of type a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    #[default]
    Interface,
    Annotation,
    Class,
}

/// One method of a projection interface.
///
/// At most one of `read`, `write` and `delete` may be set; a method with none of
/// them is either an identity operation or delegated to a mixin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub read: Option<String>,
    #[serde(default)]
    pub write: Option<String>,
    #[serde(default)]
    pub delete: Option<String>,
    /// Interface that declares this method; unset means the projection interface itself
    #[serde(default)]
    pub declared_by: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    #[serde(default)]
    pub returns: ValueType,
}

/// A method parameter. `value` marks the parameter whose value a write stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default)]
    pub value: bool,
}

/// Annotation kinds a method can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Read,
    Write,
    Delete,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodKind::Read => "read",
            MethodKind::Write => "write",
            MethodKind::Delete => "delete",
        }
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProjectionInterface {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            public: true,
            kind: InterfaceKind::Interface,
            extends: Vec::new(),
            document_origin: None,
            methods: Vec::new(),
        }
    }

    pub fn extending(mut self, capability: &str) -> Self {
        self.extends.push(capability.to_string());
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_document_origin(mut self, origin: &str) -> Self {
        self.document_origin = Some(origin.to_string());
        self
    }

    pub fn with_kind(mut self, kind: InterfaceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// True when a value of this interface can be returned as `type_name`:
    /// the interface itself or one of the interfaces it extends.
    pub fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name || self.extends.iter().any(|e| e == type_name)
    }

    /// Interface a method is declared by, used as the mixin capability key
    pub fn capability_of<'a>(&'a self, method: &'a MethodDescriptor) -> &'a str {
        method.declared_by.as_deref().unwrap_or(&self.name)
    }

    /// Render the document origin template with call parameters.
    ///
    /// Uses the same `{n}` substitution as selectors. `None` when the interface has
    /// no document origin.
    pub fn render_document_origin(&self, args: &[Value]) -> Option<String> {
        self.document_origin
            .as_deref()
            .map(|origin| format_placeholders(origin, args))
    }
}

impl MethodDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            read: None,
            write: None,
            delete: None,
            declared_by: None,
            params: Vec::new(),
            returns: ValueType::Void,
        }
    }

    pub fn reading(mut self, selector: &str) -> Self {
        self.read = Some(selector.to_string());
        self
    }

    pub fn writing(mut self, selector: &str) -> Self {
        self.write = Some(selector.to_string());
        self
    }

    pub fn deleting(mut self, selector: &str) -> Self {
        self.delete = Some(selector.to_string());
        self
    }

    pub fn declared_by(mut self, interface: &str) -> Self {
        self.declared_by = Some(interface.to_string());
        self
    }

    pub fn param(mut self, name: &str, ty: ValueType) -> Self {
        self.params.push(ParamDescriptor {
            name: name.to_string(),
            ty,
            value: false,
        });
        self
    }

    /// Add a parameter marked as the value to write
    pub fn value_param(mut self, name: &str, ty: ValueType) -> Self {
        self.params.push(ParamDescriptor {
            name: name.to_string(),
            ty,
            value: true,
        });
        self
    }

    pub fn returning(mut self, ty: ValueType) -> Self {
        self.returns = ty;
        self
    }

    /// Every annotation the method carries, in read/write/delete order
    pub fn annotations(&self) -> Vec<(MethodKind, &str)> {
        [
            (MethodKind::Read, &self.read),
            (MethodKind::Write, &self.write),
            (MethodKind::Delete, &self.delete),
        ]
        .into_iter()
        .filter_map(|(kind, selector)| selector.as_deref().map(|s| (kind, s)))
        .collect()
    }

    /// The single annotation of a valid method
    pub fn annotation(&self) -> Option<(MethodKind, &str)> {
        self.annotations().into_iter().next()
    }

    /// Index of the parameter a write stores: the marked one, else the first
    pub fn value_param_index(&self) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.value)
            .or_else(|| (!self.params.is_empty()).then_some(0))
    }
}
