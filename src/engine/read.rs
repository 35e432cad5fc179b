// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::dom::{NodeId, NodeRef};
use crate::engine::dispatch::MethodBinding;
use crate::engine::Projection;
use crate::errors::{ConversionError, ProjectionError, ProjectionResult, SelectorError};
use crate::observability::messages::invocation::ConversionFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::XPathValue;
use crate::types::{Value, ValueType};
use crate::utils::format_placeholders;

/// Selector result captured under the document's read lock.
struct Selection {
    selector: String,
    value: XPathValue,
    /// String values of the matched nodes, in document order
    texts: Vec<String>,
}

/// Evaluate the method's selector and convert the result to its return type.
pub(crate) fn read(
    projection: &Projection,
    binding: &MethodBinding,
    args: &[Value],
) -> ProjectionResult<Value> {
    let selection = select(projection, &format_placeholders(&binding.selector, args))?;

    let result = match &binding.returns {
        ValueType::List(item) => match &selection.value {
            XPathValue::NodeSet(nodes) => nodes
                .iter()
                .zip(&selection.texts)
                .map(|(node, text)| convert_node(projection, item, *node, text, &selection))
                .collect::<ProjectionResult<Vec<_>>>()
                .map(Value::List),
            _ => convert_first(projection, item, &selection).map(|v| Value::List(vec![v])),
        },
        ty => convert_first(projection, ty, &selection),
    };

    if let Err(ProjectionError::Conversion(error)) = &result {
        ConversionFailed {
            method: &binding.method,
            target: &binding.returns.to_string(),
            error,
        }
        .log();
    }
    result
}

fn select(projection: &Projection, selector: &str) -> ProjectionResult<Selection> {
    let tree = projection.owner_document().read();
    let value = projection
        .projector()
        .evaluator()
        .evaluate(&tree, projection.dom_node().id(), selector)?;
    let texts = value
        .nodes()
        .iter()
        .map(|node| tree.string_value(*node))
        .collect();
    Ok(Selection {
        selector: selector.to_string(),
        value,
        texts,
    })
}

/// Convert the whole selector result (first node for node-sets) to `ty`.
fn convert_first(
    projection: &Projection,
    ty: &ValueType,
    selection: &Selection,
) -> ProjectionResult<Value> {
    let converter = projection.projector().converter();
    match &selection.value {
        XPathValue::NodeSet(nodes) => match (nodes.first(), selection.texts.first()) {
            (Some(node), Some(text)) => convert_node(projection, ty, *node, text, selection),
            _ => Ok(converter.zero_value(ty)),
        },
        _ if matches!(ty, ValueType::Node | ValueType::Projection(_)) => {
            Err(SelectorError::NotANodeSet {
                expression: selection.selector.clone(),
            }
            .into())
        }
        XPathValue::Number(number) => Ok(converter.from_number(*number, ty)?),
        XPathValue::String(text) => Ok(converter.to_host_value(text, ty)?),
        XPathValue::Boolean(flag) => Ok(converter.from_boolean(*flag, ty)?),
    }
}

fn convert_node(
    projection: &Projection,
    ty: &ValueType,
    node: NodeId,
    text: &str,
    selection: &Selection,
) -> ProjectionResult<Value> {
    let node_ref = NodeRef::new(projection.owner_document().clone(), node);
    match ty {
        ValueType::Node => Ok(Value::Node(node_ref)),
        ValueType::Projection(interface) => projection
            .projector()
            .bind(&node_ref, interface)
            .map(Value::Projection),
        ValueType::List(_) => Err(ConversionError::UnsupportedType(format!(
            "{} (nested lists are not read from '{}')",
            ty, selection.selector
        ))
        .into()),
        ty => Ok(projection.projector().converter().to_host_value(text, ty)?),
    }
}
