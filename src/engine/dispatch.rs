// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{MethodDescriptor, MethodKind, ParamDescriptor, ProjectionInterface};
use crate::types::ValueType;

/// Operations every projection answers without an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityOp {
    Equals,
    HashCode,
    ToString,
    AsString,
    GetProjectionInterface,
    GetDomNode,
    GetDomOwnerDocument,
    GetDomBaseElement,
}

impl IdentityOp {
    pub fn from_method_name(name: &str) -> Option<Self> {
        let op = match name {
            "equals" => IdentityOp::Equals,
            "hashCode" => IdentityOp::HashCode,
            "toString" => IdentityOp::ToString,
            "asString" => IdentityOp::AsString,
            "getProjectionInterface" => IdentityOp::GetProjectionInterface,
            "getDOMNode" => IdentityOp::GetDomNode,
            "getDOMOwnerDocument" => IdentityOp::GetDomOwnerDocument,
            "getDOMBaseElement" => IdentityOp::GetDomBaseElement,
            _ => return None,
        };
        Some(op)
    }
}

/// Everything the engine needs to run one annotated method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBinding {
    pub method: String,
    pub selector: String,
    pub params: Vec<ParamDescriptor>,
    pub returns: ValueType,
    /// Parameter whose value a write stores
    pub value_index: Option<usize>,
}

impl MethodBinding {
    fn from_descriptor(method: &MethodDescriptor, selector: &str) -> Self {
        Self {
            method: method.name.clone(),
            selector: selector.to_string(),
            params: method.params.clone(),
            returns: method.returns.clone(),
            value_index: method.value_param_index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Identity(IdentityOp),
    Read(MethodBinding),
    Write(MethodBinding),
    Delete(MethodBinding),
    /// No annotation: only a mixin can answer
    Delegated,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Identity(_) => "identity",
            Operation::Read(_) => "read",
            Operation::Write(_) => "write",
            Operation::Delete(_) => "delete",
            Operation::Delegated => "delegated",
        }
    }
}

/// A dispatch entry: the operation plus the capability its method belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    pub operation: Operation,
    /// Declaring interface, the key mixins are looked up under
    pub capability: String,
}

/// Per-interface table from method name to operation, built once at bind time.
///
/// Declared methods win over identity operations of the same name when they carry
/// an annotation. Identity operations are answered for every interface, declared
/// or not.
#[derive(Debug)]
pub struct DispatchTable {
    interface: Arc<ProjectionInterface>,
    entries: HashMap<String, DispatchEntry>,
}

impl DispatchTable {
    /// Build the table. The interface must already have passed validation.
    pub fn build(interface: Arc<ProjectionInterface>) -> Self {
        let mut entries = HashMap::with_capacity(interface.methods.len());

        for method in &interface.methods {
            let operation = match method.annotation() {
                Some((MethodKind::Read, selector)) => {
                    Operation::Read(MethodBinding::from_descriptor(method, selector))
                }
                Some((MethodKind::Write, selector)) => {
                    Operation::Write(MethodBinding::from_descriptor(method, selector))
                }
                Some((MethodKind::Delete, selector)) => {
                    Operation::Delete(MethodBinding::from_descriptor(method, selector))
                }
                None => match IdentityOp::from_method_name(&method.name) {
                    Some(op) => Operation::Identity(op),
                    None => Operation::Delegated,
                },
            };
            entries.insert(
                method.name.clone(),
                DispatchEntry {
                    operation,
                    capability: interface.capability_of(method).to_string(),
                },
            );
        }

        Self { interface, entries }
    }

    pub fn interface(&self) -> &Arc<ProjectionInterface> {
        &self.interface
    }

    pub fn interface_name(&self) -> &str {
        &self.interface.name
    }

    /// Resolve a method name; undeclared identity operations resolve too.
    pub fn resolve(&self, method: &str) -> Option<DispatchEntry> {
        if let Some(entry) = self.entries.get(method) {
            return Some(entry.clone());
        }
        IdentityOp::from_method_name(method).map(|op| DispatchEntry {
            operation: Operation::Identity(op),
            capability: self.interface.name.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
