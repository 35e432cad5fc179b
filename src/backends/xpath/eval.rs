// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tree walking evaluation of the selector AST with XPath 1.0 value semantics.

use crate::backends::xpath::functions::call_function;
use crate::backends::xpath::parser::{ArithOp, Axis, CompareOp, Expr, LocationPath, NodeTest, Step};
use crate::dom::{DomTree, NodeId, NodeKind};
use crate::errors::SelectorError;
use crate::traits::XPathValue;

/// Evaluation context: context node plus proximity position and size
#[derive(Clone, Copy)]
pub(crate) struct Context<'t> {
    pub tree: &'t DomTree,
    pub node: NodeId,
    pub position: usize,
    pub size: usize,
}

impl<'t> Context<'t> {
    pub fn new(tree: &'t DomTree, node: NodeId) -> Self {
        Self {
            tree,
            node,
            position: 1,
            size: 1,
        }
    }

    fn at(&self, node: NodeId, position: usize, size: usize) -> Self {
        Self {
            tree: self.tree,
            node,
            position,
            size,
        }
    }
}

pub(crate) fn evaluate(expr: &Expr, ctx: &Context<'_>) -> Result<XPathValue, SelectorError> {
    match expr {
        Expr::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expr::Number(n) => Ok(XPathValue::Number(*n)),
        Expr::Or(l, r) => {
            let result = to_boolean(&evaluate(l, ctx)?) || to_boolean(&evaluate(r, ctx)?);
            Ok(XPathValue::Boolean(result))
        }
        Expr::And(l, r) => {
            let result = to_boolean(&evaluate(l, ctx)?) && to_boolean(&evaluate(r, ctx)?);
            Ok(XPathValue::Boolean(result))
        }
        Expr::Compare(op, l, r) => {
            let left = evaluate(l, ctx)?;
            let right = evaluate(r, ctx)?;
            Ok(XPathValue::Boolean(compare_values(*op, &left, &right, ctx.tree)))
        }
        Expr::Arith(op, l, r) => {
            let a = to_number(&evaluate(l, ctx)?, ctx.tree);
            let b = to_number(&evaluate(r, ctx)?, ctx.tree);
            Ok(XPathValue::Number(match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
                ArithOp::Mod => a % b,
            }))
        }
        Expr::Negate(inner) => Ok(XPathValue::Number(-to_number(&evaluate(inner, ctx)?, ctx.tree))),
        Expr::Union(l, r) => {
            let (XPathValue::NodeSet(mut left), XPathValue::NodeSet(right)) =
                (evaluate(l, ctx)?, evaluate(r, ctx)?)
            else {
                return Err(SelectorError::NotANodeSet {
                    expression: "union operand".to_string(),
                });
            };
            left.extend(right);
            Ok(XPathValue::NodeSet(sort_unique(left, ctx.tree)))
        }
        Expr::Path(path) => Ok(XPathValue::NodeSet(evaluate_path(path, ctx)?)),
        Expr::Filter {
            primary,
            predicates,
            steps,
        } => {
            let XPathValue::NodeSet(nodes) = evaluate(primary, ctx)? else {
                return Err(SelectorError::NotANodeSet {
                    expression: "filter expression".to_string(),
                });
            };
            let mut nodes = sort_unique(nodes, ctx.tree);
            for predicate in predicates {
                nodes = apply_predicate(nodes, predicate, ctx)?;
            }
            Ok(XPathValue::NodeSet(apply_steps(nodes, steps, ctx)?))
        }
        Expr::Function { name, args } => call_function(name, args, ctx),
    }
}

fn evaluate_path(path: &LocationPath, ctx: &Context<'_>) -> Result<Vec<NodeId>, SelectorError> {
    let start = if path.absolute {
        ctx.tree.tree_root(ctx.node)
    } else {
        ctx.node
    };
    apply_steps(vec![start], &path.steps, ctx)
}

fn apply_steps(
    mut nodes: Vec<NodeId>,
    steps: &[Step],
    ctx: &Context<'_>,
) -> Result<Vec<NodeId>, SelectorError> {
    for step in steps {
        let mut next = Vec::new();
        for node in &nodes {
            let mut candidates: Vec<NodeId> = axis_nodes(ctx.tree, *node, step.axis)
                .into_iter()
                .filter(|c| node_test(ctx.tree, *c, &step.test, step.axis))
                .collect();
            for predicate in &step.predicates {
                candidates = apply_predicate(candidates, predicate, ctx)?;
            }
            next.extend(candidates);
        }
        nodes = sort_unique(next, ctx.tree);
    }
    Ok(nodes)
}

fn apply_predicate(
    nodes: Vec<NodeId>,
    predicate: &Expr,
    ctx: &Context<'_>,
) -> Result<Vec<NodeId>, SelectorError> {
    let size = nodes.len();
    let mut kept = Vec::with_capacity(size);
    for (i, node) in nodes.into_iter().enumerate() {
        let inner = ctx.at(node, i + 1, size);
        let keep = match evaluate(predicate, &inner)? {
            XPathValue::Number(n) => n == (i + 1) as f64,
            other => to_boolean(&other),
        };
        if keep {
            kept.push(node);
        }
    }
    Ok(kept)
}

/// Nodes along `axis` in axis order (reverse axes nearest first)
fn axis_nodes(tree: &DomTree, node: NodeId, axis: Axis) -> Vec<NodeId> {
    match axis {
        Axis::Child => tree.children(node).to_vec(),
        Axis::Attribute => tree.attributes(node).to_vec(),
        Axis::Descendant => tree.descendants(node),
        Axis::DescendantOrSelf => {
            let mut out = vec![node];
            out.extend(tree.descendants(node));
            out
        }
        Axis::SelfAxis => vec![node],
        Axis::Parent => tree.parent(node).into_iter().collect(),
        Axis::Ancestor => tree.ancestors(node),
        Axis::AncestorOrSelf => {
            let mut out = vec![node];
            out.extend(tree.ancestors(node));
            out
        }
        Axis::FollowingSibling | Axis::PrecedingSibling => {
            if tree.kind(node) == Some(NodeKind::Attribute) {
                return Vec::new();
            }
            let Some(parent) = tree.parent(node) else {
                return Vec::new();
            };
            let siblings = tree.children(parent);
            let Some(position) = siblings.iter().position(|s| *s == node) else {
                return Vec::new();
            };
            if axis == Axis::FollowingSibling {
                siblings[position + 1..].to_vec()
            } else {
                siblings[..position].iter().rev().copied().collect()
            }
        }
    }
}

fn node_test(tree: &DomTree, node: NodeId, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeKind::Attribute
    } else {
        NodeKind::Element
    };
    let kind = tree.kind(node);
    match test {
        NodeTest::Node => true,
        NodeTest::Any => kind == Some(principal),
        NodeTest::Name(name) => kind == Some(principal) && tree.name(node) == Some(name.as_str()),
        NodeTest::Text => kind == Some(NodeKind::Text),
        NodeTest::Comment => kind == Some(NodeKind::Comment),
    }
}

pub(crate) fn sort_unique(mut nodes: Vec<NodeId>, tree: &DomTree) -> Vec<NodeId> {
    nodes.sort_by(|a, b| tree.document_order(*a, *b));
    nodes.dedup();
    nodes
}

#[derive(Debug, Clone)]
enum Atomic {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn compare_values(op: CompareOp, left: &XPathValue, right: &XPathValue, tree: &DomTree) -> bool {
    use XPathValue::*;
    match (left, right) {
        (NodeSet(a), NodeSet(b)) => a.iter().any(|x| {
            let sx = tree.string_value(*x);
            b.iter()
                .any(|y| compare_atomic(op, &Atomic::Str(sx.clone()), &Atomic::Str(tree.string_value(*y))))
        }),
        (NodeSet(a), other) => match other {
            Boolean(b) => compare_atomic(op, &Atomic::Bool(!a.is_empty()), &Atomic::Bool(*b)),
            _ => {
                let other = atomize(other);
                a.iter().any(|x| compare_atomic(op, &node_atomic(tree, *x, &other), &other))
            }
        },
        (other, NodeSet(b)) => match other {
            Boolean(a) => compare_atomic(op, &Atomic::Bool(*a), &Atomic::Bool(!b.is_empty())),
            _ => {
                let other = atomize(other);
                b.iter().any(|y| compare_atomic(op, &other, &node_atomic(tree, *y, &other)))
            }
        },
        (a, b) => compare_atomic(op, &atomize(a), &atomize(b)),
    }
}

/// A node's string-value, as a number when compared with a number
fn node_atomic(tree: &DomTree, node: NodeId, against: &Atomic) -> Atomic {
    let text = tree.string_value(node);
    match against {
        Atomic::Num(_) => Atomic::Num(string_to_number(&text)),
        _ => Atomic::Str(text),
    }
}

fn atomize(value: &XPathValue) -> Atomic {
    match value {
        XPathValue::String(s) => Atomic::Str(s.clone()),
        XPathValue::Number(n) => Atomic::Num(*n),
        XPathValue::Boolean(b) => Atomic::Bool(*b),
        XPathValue::NodeSet(_) => Atomic::Bool(false),
    }
}

fn compare_atomic(op: CompareOp, a: &Atomic, b: &Atomic) -> bool {
    match op {
        CompareOp::Eq | CompareOp::NotEq => {
            let equal = match (a, b) {
                (Atomic::Bool(_), _) | (_, Atomic::Bool(_)) => atomic_bool(a) == atomic_bool(b),
                (Atomic::Num(_), _) | (_, Atomic::Num(_)) => atomic_num(a) == atomic_num(b),
                (Atomic::Str(x), Atomic::Str(y)) => x == y,
            };
            (op == CompareOp::Eq) == equal
        }
        _ => {
            let (x, y) = (atomic_num(a), atomic_num(b));
            match op {
                CompareOp::Lt => x < y,
                CompareOp::Le => x <= y,
                CompareOp::Gt => x > y,
                _ => x >= y,
            }
        }
    }
}

fn atomic_bool(a: &Atomic) -> bool {
    match a {
        Atomic::Bool(b) => *b,
        Atomic::Num(n) => *n != 0.0 && !n.is_nan(),
        Atomic::Str(s) => !s.is_empty(),
    }
}

fn atomic_num(a: &Atomic) -> f64 {
    match a {
        Atomic::Bool(b) => f64::from(u8::from(*b)),
        Atomic::Num(n) => *n,
        Atomic::Str(s) => string_to_number(s),
    }
}

pub(crate) fn to_boolean(value: &XPathValue) -> bool {
    match value {
        XPathValue::NodeSet(nodes) => !nodes.is_empty(),
        XPathValue::String(s) => !s.is_empty(),
        XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
        XPathValue::Boolean(b) => *b,
    }
}

pub(crate) fn to_number(value: &XPathValue, tree: &DomTree) -> f64 {
    match value {
        XPathValue::Number(n) => *n,
        XPathValue::Boolean(b) => f64::from(u8::from(*b)),
        XPathValue::String(s) => string_to_number(s),
        XPathValue::NodeSet(_) => string_to_number(&to_xpath_string(value, tree)),
    }
}

/// XPath string conversion; a node-set yields the string-value of its first node
pub(crate) fn to_xpath_string(value: &XPathValue, tree: &DomTree) -> String {
    match value {
        XPathValue::NodeSet(nodes) => nodes
            .first()
            .map(|n| tree.string_value(*n))
            .unwrap_or_default(),
        XPathValue::String(s) => s.clone(),
        XPathValue::Number(n) => number_to_string(*n),
        XPathValue::Boolean(b) => b.to_string(),
    }
}

/// XPath `number()` on a string: optional minus, digits, optional fraction
pub(crate) fn string_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let well_formed = !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1;
    if !well_formed {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// XPath number to string: integers without fraction, `NaN`, `Infinity`
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
