// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Method dispatch for projections.

use crate::config::Flag;
use crate::engine::dispatch::{IdentityOp, MethodBinding, Operation};
use crate::engine::sync::DocumentLock;
use crate::engine::{read, write, Projection};
use crate::errors::{ProjectionError, ProjectionResult};
use crate::observability::messages::invocation::{InvocationFailed, InvocationStarted};
use crate::observability::messages::mixin::MixinDelegated;
use crate::observability::messages::StructuredLog;
use crate::types::{Value, ValueType};

pub(crate) fn invoke(projection: &Projection, method: &str, args: &[Value]) -> ProjectionResult<Value> {
    let _lock = projection
        .projector()
        .has_flag(Flag::SynchronizeOnDocuments)
        .then(|| DocumentLock::acquire(projection.owner_document()));

    let result = dispatch(projection, method, args);
    if let Err(error) = &result {
        InvocationFailed {
            interface: projection.interface_name(),
            method,
            error,
        }
        .log();
    }
    result
}

fn dispatch(projection: &Projection, method: &str, args: &[Value]) -> ProjectionResult<Value> {
    let interface = projection.interface_name();
    let entry = projection
        .table()
        .resolve(method)
        .ok_or_else(|| ProjectionError::UnknownMethod {
            interface: interface.to_string(),
            method: method.to_string(),
        })?;

    InvocationStarted {
        interface,
        method,
        operation: entry.operation.name(),
        argument_count: args.len(),
    }
    .log();

    if !matches!(entry.operation, Operation::Identity(_)) {
        let mixin = projection
            .projector()
            .mixin_registry()
            .lookup(interface, &entry.capability);
        if let Some(mixin) = mixin {
            MixinDelegated {
                interface,
                method,
                capability: &entry.capability,
            }
            .log();
            return mixin.invoke(projection, method, args);
        }
    }

    match entry.operation {
        Operation::Identity(op) => identity(projection, op, args),
        Operation::Read(binding) => {
            let args = coerce_arguments(projection, &binding, args)?;
            read::read(projection, &binding, &args)
        }
        Operation::Write(binding) => {
            let args = coerce_arguments(projection, &binding, args)?;
            write::write(projection, &binding, &args)?;
            Ok(fluent_return(projection, &binding))
        }
        Operation::Delete(binding) => {
            let args = coerce_arguments(projection, &binding, args)?;
            write::delete(projection, &binding, &args)?;
            Ok(fluent_return(projection, &binding))
        }
        Operation::Delegated => Err(ProjectionError::MixinMissing {
            interface: interface.to_string(),
            capability: entry.capability,
            method: method.to_string(),
        }),
    }
}

fn identity(projection: &Projection, op: IdentityOp, args: &[Value]) -> ProjectionResult<Value> {
    let value = match op {
        IdentityOp::Equals => match args {
            [Value::Projection(other)] => Value::Boolean(projection == other),
            [_] => Value::Boolean(false),
            _ => {
                return Err(ProjectionError::IllegalArgument(format!(
                    "equals takes one argument, got {}",
                    args.len()
                )))
            }
        },
        IdentityOp::HashCode => {
            let hash = projection.structural_hash();
            Value::Int(((hash >> 32) ^ hash) as u32 as i32)
        }
        IdentityOp::ToString => Value::String(projection.to_string()),
        IdentityOp::AsString => Value::String(projection.as_string()),
        IdentityOp::GetProjectionInterface => {
            Value::String(projection.interface_name().to_string())
        }
        IdentityOp::GetDomNode => Value::Node(projection.dom_node().clone()),
        IdentityOp::GetDomOwnerDocument => Value::Node(projection.owner_document().root()),
        IdentityOp::GetDomBaseElement => projection.base_element().into(),
    };
    Ok(value)
}

/// Check the arity and convert every argument to its declared parameter type.
fn coerce_arguments(
    projection: &Projection,
    binding: &MethodBinding,
    args: &[Value],
) -> ProjectionResult<Vec<Value>> {
    if args.len() != binding.params.len() {
        return Err(ProjectionError::IllegalArgument(format!(
            "{}.{} takes {} arguments, got {}",
            projection.interface_name(),
            binding.method,
            binding.params.len(),
            args.len()
        )));
    }
    let converter = projection.projector().converter();
    binding
        .params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            converter
                .coerce_argument(arg, &param.ty)
                .map_err(ProjectionError::from)
        })
        .collect()
}

/// Writes and deletes return the projection itself when the declared return type
/// is the projection's interface (or one it extends), nothing otherwise.
fn fluent_return(projection: &Projection, binding: &MethodBinding) -> Value {
    match &binding.returns {
        ValueType::Projection(name) if projection.projection_interface().is_assignable_to(name) => {
            Value::Projection(projection.clone())
        }
        _ => Value::Unit,
    }
}
