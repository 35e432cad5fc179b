// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core function library.

use crate::backends::xpath::eval::{
    evaluate, string_to_number, to_boolean, to_number, to_xpath_string, Context,
};
use crate::backends::xpath::parser::Expr;
use crate::errors::SelectorError;
use crate::traits::XPathValue;

pub(crate) fn call_function(
    name: &str,
    args: &[Expr],
    ctx: &Context<'_>,
) -> Result<XPathValue, SelectorError> {
    let values = args
        .iter()
        .map(|a| evaluate(a, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let tree = ctx.tree;
    let arity = |min: usize, max: usize| -> Result<(), SelectorError> {
        if values.len() < min || values.len() > max {
            let expected = if min == max {
                min.to_string()
            } else if max == usize::MAX {
                format!("at least {}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(SelectorError::Arity {
                function: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(())
    };
    // string argument or the context node's string-value
    let string_arg = |i: usize| -> String {
        values
            .get(i)
            .map(|v| to_xpath_string(v, tree))
            .unwrap_or_else(|| tree.string_value(ctx.node))
    };
    let node_set_arg = |i: usize| -> Result<Vec<crate::dom::NodeId>, SelectorError> {
        match values.get(i) {
            Some(XPathValue::NodeSet(nodes)) => Ok(nodes.clone()),
            Some(_) => Err(SelectorError::NotANodeSet {
                expression: format!("argument {} of {}()", i + 1, name),
            }),
            None => Ok(vec![ctx.node]),
        }
    };

    let value = match name {
        "last" => {
            arity(0, 0)?;
            XPathValue::Number(ctx.size as f64)
        }
        "position" => {
            arity(0, 0)?;
            XPathValue::Number(ctx.position as f64)
        }
        "count" => {
            arity(1, 1)?;
            XPathValue::Number(node_set_arg(0)?.len() as f64)
        }
        "name" | "local-name" => {
            arity(0, 1)?;
            let name_value = node_set_arg(0)?
                .first()
                .and_then(|n| tree.name(*n))
                .unwrap_or("")
                .to_string();
            if name == "local-name" {
                let local = name_value.rsplit(':').next().unwrap_or("").to_string();
                XPathValue::String(local)
            } else {
                XPathValue::String(name_value)
            }
        }
        "string" => {
            arity(0, 1)?;
            XPathValue::String(string_arg(0))
        }
        "number" => {
            arity(0, 1)?;
            match values.first() {
                Some(v) => XPathValue::Number(to_number(v, tree)),
                None => XPathValue::Number(string_to_number(&tree.string_value(ctx.node))),
            }
        }
        "boolean" => {
            arity(1, 1)?;
            XPathValue::Boolean(to_boolean(&values[0]))
        }
        "not" => {
            arity(1, 1)?;
            XPathValue::Boolean(!to_boolean(&values[0]))
        }
        "true" => {
            arity(0, 0)?;
            XPathValue::Boolean(true)
        }
        "false" => {
            arity(0, 0)?;
            XPathValue::Boolean(false)
        }
        "concat" => {
            arity(2, usize::MAX)?;
            XPathValue::String(values.iter().map(|v| to_xpath_string(v, tree)).collect())
        }
        "contains" => {
            arity(2, 2)?;
            XPathValue::Boolean(string_arg(0).contains(&string_arg(1)))
        }
        "starts-with" => {
            arity(2, 2)?;
            XPathValue::Boolean(string_arg(0).starts_with(&string_arg(1)))
        }
        "substring-before" => {
            arity(2, 2)?;
            let (haystack, needle) = (string_arg(0), string_arg(1));
            let before = haystack
                .find(&needle)
                .map(|i| haystack[..i].to_string())
                .unwrap_or_default();
            XPathValue::String(before)
        }
        "substring-after" => {
            arity(2, 2)?;
            let (haystack, needle) = (string_arg(0), string_arg(1));
            let after = haystack
                .find(&needle)
                .map(|i| haystack[i + needle.len()..].to_string())
                .unwrap_or_default();
            XPathValue::String(after)
        }
        "substring" => {
            arity(2, 3)?;
            XPathValue::String(substring(
                &string_arg(0),
                to_number(&values[1], tree),
                values.get(2).map(|v| to_number(v, tree)),
            ))
        }
        "string-length" => {
            arity(0, 1)?;
            XPathValue::Number(string_arg(0).chars().count() as f64)
        }
        "normalize-space" => {
            arity(0, 1)?;
            XPathValue::String(string_arg(0).split_whitespace().collect::<Vec<_>>().join(" "))
        }
        "sum" => {
            arity(1, 1)?;
            let total: f64 = node_set_arg(0)?
                .iter()
                .map(|n| string_to_number(&tree.string_value(*n)))
                .sum();
            XPathValue::Number(total)
        }
        "floor" => {
            arity(1, 1)?;
            XPathValue::Number(to_number(&values[0], tree).floor())
        }
        "ceiling" => {
            arity(1, 1)?;
            XPathValue::Number(to_number(&values[0], tree).ceil())
        }
        "round" => {
            arity(1, 1)?;
            // XPath rounds halves towards positive infinity
            XPathValue::Number((to_number(&values[0], tree) + 0.5).floor())
        }
        _ => {
            return Err(SelectorError::UnknownFunction {
                name: name.to_string(),
            })
        }
    };
    Ok(value)
}

/// XPath `substring()` with 1-based, rounded positions
fn substring(text: &str, start: f64, length: Option<f64>) -> String {
    let start = (start + 0.5).floor();
    let end = match length {
        Some(len) => start + (len + 0.5).floor(),
        None => f64::INFINITY,
    };
    text.chars()
        .enumerate()
        .filter(|(i, _)| {
            let position = (*i + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, c)| c)
        .collect()
}
