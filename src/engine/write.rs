// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Writes and deletes.
//!
//! Everything that can fail without touching the tree (selector check, value
//! conversion, copying sub-projection fragments out of their documents) happens
//! before the target document's write lock is taken.

use crate::config::{keeps_predicate_shape, parse_write_path, WritePath, WriteStep};
use crate::dom::{DomTree, NodeId, NodeKind, NodeRef};
use crate::engine::dispatch::MethodBinding;
use crate::engine::Projection;
use crate::errors::{ProjectionError, ProjectionResult};
use crate::observability::messages::invocation::{ConversionFailed, NodesDeleted, WritePathCreated};
use crate::observability::messages::StructuredLog;
use crate::types::{TypeConverter, Value, ValueType};
use crate::utils::format_placeholders;

/// A write argument, converted and ready to be applied.
#[derive(Debug)]
enum Payload {
    Text(String),
    /// Copy of a node; its document element is the node to insert
    Subtree(DomTree),
    List(Vec<Payload>),
    Remove,
}

struct Target<'a> {
    tree: &'a mut DomTree,
    context: NodeId,
    path: WritePath,
    selector: String,
}

/// Position while resolving a write path: an existing node or an element the
/// plan will create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Existing(NodeId),
    Planned(usize),
}

/// Everything a missing write target needs, resolved before the tree changes.
#[derive(Debug)]
struct PathPlan {
    /// Elements to create, in order, as (parent, name)
    elements: Vec<(Cursor, String)>,
    /// Attribute to create on its owner, always the last step
    attribute: Option<(Cursor, String)>,
    target: Cursor,
}

impl PathPlan {
    fn creates_under(&self, parent: Cursor) -> bool {
        self.elements.iter().any(|(p, _)| *p == parent)
    }
}

/// Render `template` with `args` and parse the result as a write path.
fn render_write_path(template: &str, args: &[Value]) -> ProjectionResult<(String, WritePath)> {
    let selector = format_placeholders(template, args);
    match parse_write_path(&selector) {
        Some(path) if keeps_predicate_shape(template, &path) => Ok((selector, path)),
        _ => Err(ProjectionError::IllegalWriteSelector { selector }),
    }
}

pub(crate) fn write(
    projection: &Projection,
    binding: &MethodBinding,
    args: &[Value],
) -> ProjectionResult<()> {
    let (selector, path) = render_write_path(&binding.selector, args)?;

    let value = binding
        .value_index
        .and_then(|i| args.get(i))
        .cloned()
        .unwrap_or(Value::Null);
    let declared = binding
        .value_index
        .and_then(|i| binding.params.get(i))
        .map(|p| p.ty.clone())
        .unwrap_or_default();

    let converter = projection.projector().converter();
    let payload = match prepare(converter, &value, &declared) {
        Ok(payload) => payload,
        Err(error) => {
            if let ProjectionError::Conversion(conversion) = &error {
                ConversionFailed {
                    method: &binding.method,
                    target: &declared.to_string(),
                    error: conversion,
                }
                .log();
            }
            return Err(error);
        }
    };

    let evaluator = projection.projector().evaluator();
    let mut tree = projection.owner_document().write();
    let matches = evaluator
        .evaluate(&tree, projection.dom_node().id(), &selector)?
        .nodes()
        .to_vec();

    let mut target = Target {
        tree: &mut *tree,
        context: projection.dom_node().id(),
        path,
        selector,
    };
    target.apply(payload, matches)
}

pub(crate) fn delete(
    projection: &Projection,
    binding: &MethodBinding,
    args: &[Value],
) -> ProjectionResult<()> {
    let (selector, _) = render_write_path(&binding.selector, args)?;

    let mut tree = projection.owner_document().write();
    let matches = projection
        .projector()
        .evaluator()
        .evaluate(&tree, projection.dom_node().id(), &selector)?
        .nodes()
        .to_vec();

    let mut count = 0;
    for node in matches {
        if tree.kind(node) != Some(NodeKind::Document) {
            tree.discard(node);
            count += 1;
        }
    }
    NodesDeleted {
        selector: &selector,
        count,
    }
    .log();
    Ok(())
}

fn prepare(converter: &TypeConverter, value: &Value, declared: &ValueType) -> ProjectionResult<Payload> {
    let payload = match value {
        Value::Null => match declared {
            ValueType::Projection(_) | ValueType::Node | ValueType::List(_) => Payload::Remove,
            _ => Payload::Text(String::new()),
        },
        Value::Projection(projection) => Payload::Subtree(fragment_of(projection.dom_node())?),
        Value::Node(node) => Payload::Subtree(fragment_of(node)?),
        Value::List(items) => {
            let item_type = match declared {
                ValueType::List(item) => item.as_ref().clone(),
                _ => ValueType::Void,
            };
            Payload::List(
                items
                    .iter()
                    .map(|item| prepare(converter, item, &item_type))
                    .collect::<ProjectionResult<_>>()?,
            )
        }
        scalar => Payload::Text(converter.to_node_text(scalar)?),
    };
    Ok(payload)
}

/// Copy `node` out of its document. The read guard is released before the caller
/// locks the target document, which may be the same one.
fn fragment_of(node: &NodeRef) -> ProjectionResult<DomTree> {
    let tree = node.document().read();
    match tree.kind(node.id()) {
        Some(NodeKind::Document) | Some(NodeKind::Element) => {}
        other => {
            return Err(ProjectionError::IllegalArgument(format!(
                "only documents and elements can be written as subtrees, got {:?}",
                other
            )))
        }
    }
    tree.fragment(node.id()).ok_or_else(|| {
        ProjectionError::IllegalArgument("cannot write an empty document as a subtree".to_string())
    })
}

impl Target<'_> {
    fn apply(&mut self, payload: Payload, matches: Vec<NodeId>) -> ProjectionResult<()> {
        match payload {
            Payload::Remove => {
                for node in matches {
                    if self.tree.kind(node) != Some(NodeKind::Document) {
                        self.tree.discard(node);
                    }
                }
                Ok(())
            }
            Payload::Text(text) => {
                if matches.is_empty() {
                    let created = self.create_path()?;
                    self.tree.set_text_content(created, &text);
                    return Ok(());
                }
                if matches.iter().any(|node| self.is_empty_document(*node)) {
                    return Err(ProjectionError::IllegalArgument(format!(
                        "'{}' selects a document without a document element, there is no node to hold the text",
                        self.selector
                    )));
                }
                for node in matches {
                    self.tree.set_text_content(node, &text);
                }
                Ok(())
            }
            Payload::Subtree(fragment) => {
                if self.path.steps == [WriteStep::SelfNode] {
                    return self.replace_self(&fragment);
                }
                self.require_element_target()?;
                if matches.is_empty() {
                    let created = self.create_path()?;
                    self.replace_with(created, &fragment)
                } else {
                    for node in matches {
                        self.replace_with(node, &fragment)?;
                    }
                    Ok(())
                }
            }
            Payload::List(items) => {
                self.require_element_target()?;
                if items.iter().any(|item| matches!(item, Payload::List(_))) {
                    return Err(ProjectionError::IllegalArgument(format!(
                        "nested lists cannot be written to '{}'",
                        self.selector
                    )));
                }
                let created = items
                    .iter()
                    .filter(|item| !matches!(item, Payload::Remove))
                    .count();
                if created > 0 {
                    let plan = self.plan(&matches)?;
                    if created > 1 && self.creates_document_element(&plan) {
                        return Err(self.second_document_element());
                    }
                }

                for node in matches {
                    self.tree.discard(node);
                }
                for item in items {
                    match item {
                        Payload::Text(text) => {
                            let created = self.create_path()?;
                            self.tree.set_text_content(created, &text);
                        }
                        Payload::Subtree(fragment) => {
                            let created = self.create_path()?;
                            self.replace_with(created, &fragment)?;
                        }
                        Payload::Remove | Payload::List(_) => {}
                    }
                }
                Ok(())
            }
        }
    }

    fn is_empty_document(&self, node: NodeId) -> bool {
        self.tree.kind(node) == Some(NodeKind::Document)
            && self.tree.element_children(node).next().is_none()
    }

    fn require_element_target(&self) -> ProjectionResult<()> {
        match self.path.target_element() {
            Some(_) => Ok(()),
            None => Err(ProjectionError::IllegalArgument(format!(
                "'{}' does not name an element, only text can be written there",
                self.selector
            ))),
        }
    }

    fn second_document_element(&self) -> ProjectionError {
        ProjectionError::IllegalArgument(format!(
            "'{}' would create a second document element",
            self.selector
        ))
    }

    /// Writing a subtree to "." replaces the document element of a projected
    /// document. A projected element cannot replace itself.
    fn replace_self(&mut self, fragment: &DomTree) -> ProjectionResult<()> {
        if self.tree.kind(self.context) != Some(NodeKind::Document) {
            return Err(ProjectionError::IllegalArgument(
                "a projected element cannot be replaced through '.'".to_string(),
            ));
        }
        let imported = self.import(fragment)?;
        match self.tree.document_element() {
            Some(existing) => {
                self.tree.replace_child(existing, imported);
                self.tree.discard(existing);
            }
            None => {
                self.tree.append_child(self.context, imported);
            }
        }
        Ok(())
    }

    /// Put a copy of `fragment`, renamed to the path's target element, in place
    /// of `node`.
    fn replace_with(&mut self, node: NodeId, fragment: &DomTree) -> ProjectionResult<()> {
        let imported = self.import(fragment)?;
        if let Some(name) = self.path.target_element() {
            self.tree.rename(imported, name);
        }
        if !self.tree.replace_child(node, imported) {
            self.tree.discard(imported);
            return Err(ProjectionError::IllegalArgument(format!(
                "cannot replace the node selected by '{}'",
                self.selector
            )));
        }
        self.tree.discard(node);
        self.apply_predicate(imported);
        Ok(())
    }

    fn import(&mut self, fragment: &DomTree) -> ProjectionResult<NodeId> {
        self.tree
            .import_subtree(fragment, fragment.root())
            .ok_or_else(|| ProjectionError::IllegalArgument("empty subtree".to_string()))
    }

    /// Resolve the write path from the context node without touching the tree.
    ///
    /// Intermediate element steps reuse the first existing child of that name (or
    /// one planned earlier on the same walk); the last element step is always
    /// planned as a new element, so repeated writes append siblings. Nodes in
    /// `excluded` are about to be removed and count as absent.
    fn plan(&self, excluded: &[NodeId]) -> ProjectionResult<PathPlan> {
        let start = if self.path.absolute {
            self.tree.tree_root(self.context)
        } else {
            self.context
        };
        let mut plan = PathPlan {
            elements: Vec::new(),
            attribute: None,
            target: Cursor::Existing(start),
        };
        let mut current = plan.target;
        let last = self.path.steps.len().saturating_sub(1);

        for (index, step) in self.path.steps.iter().enumerate() {
            current = match step {
                WriteStep::SelfNode => current,
                WriteStep::Parent => match current {
                    Cursor::Planned(i) => plan.elements[i].0,
                    Cursor::Existing(node) => Cursor::Existing(self.tree.parent(node).ok_or_else(|| {
                        ProjectionError::IllegalArgument(format!(
                            "'{}' climbs above the root of the document",
                            self.selector
                        ))
                    })?),
                },
                WriteStep::Attribute(name) => {
                    if let Cursor::Existing(node) = current {
                        if self.tree.kind(node) != Some(NodeKind::Element) {
                            return Err(ProjectionError::IllegalArgument(format!(
                                "'{}' sets an attribute on a node that is not an element",
                                self.selector
                            )));
                        }
                    }
                    plan.attribute = Some((current, name.clone()));
                    current
                }
                WriteStep::Element(name) => {
                    let reused = if index == last {
                        None
                    } else {
                        self.find_child(&plan, current, name, excluded)
                    };
                    match reused {
                        Some(child) => child,
                        None => {
                            if self.would_add_document_element(&plan, current, excluded) {
                                return Err(self.second_document_element());
                            }
                            plan.elements.push((current, name.clone()));
                            Cursor::Planned(plan.elements.len() - 1)
                        }
                    }
                }
            };
        }
        plan.target = current;
        Ok(plan)
    }

    fn find_child(
        &self,
        plan: &PathPlan,
        parent: Cursor,
        name: &str,
        excluded: &[NodeId],
    ) -> Option<Cursor> {
        if let Cursor::Existing(node) = parent {
            let existing = self
                .tree
                .element_children(node)
                .find(|child| !excluded.contains(child) && self.tree.name(*child) == Some(name));
            if let Some(child) = existing {
                return Some(Cursor::Existing(child));
            }
        }
        plan.elements
            .iter()
            .position(|(p, n)| *p == parent && n == name)
            .map(Cursor::Planned)
    }

    fn would_add_document_element(&self, plan: &PathPlan, parent: Cursor, excluded: &[NodeId]) -> bool {
        let Cursor::Existing(node) = parent else {
            return false;
        };
        if self.tree.kind(node) != Some(NodeKind::Document) {
            return false;
        }
        self.tree
            .element_children(node)
            .any(|child| !excluded.contains(&child))
            || plan.creates_under(parent)
    }

    fn creates_document_element(&self, plan: &PathPlan) -> bool {
        plan.elements.iter().any(|(parent, _)| match parent {
            Cursor::Existing(node) => self.tree.kind(*node) == Some(NodeKind::Document),
            Cursor::Planned(_) => false,
        })
    }

    /// Create what the write path is missing and return the node the value goes
    /// into. The path is resolved completely first, so a failing path leaves the
    /// tree untouched.
    fn create_path(&mut self) -> ProjectionResult<NodeId> {
        let plan = self.plan(&[])?;

        let mut created: Vec<NodeId> = Vec::with_capacity(plan.elements.len());
        for (parent, name) in &plan.elements {
            let parent = resolve(*parent, &created);
            let element = self.tree.create_element(name);
            self.tree.append_child(parent, element);
            created.push(element);
        }

        let target = match &plan.attribute {
            Some((owner, name)) => {
                let owner = resolve(*owner, &created);
                self.tree.set_attribute(owner, name, "").ok_or_else(|| {
                    ProjectionError::IllegalArgument(format!(
                        "'{}' sets an attribute on a node that is not an element",
                        self.selector
                    ))
                })?
            }
            None => resolve(plan.target, &created),
        };

        if self.path.target_element().is_some() {
            self.apply_predicate(target);
        }
        WritePathCreated {
            selector: &self.selector,
            created_elements: created.len(),
        }
        .log();
        Ok(target)
    }

    /// Make a created element satisfy a `[name='literal']` or `[@name='literal']`
    /// predicate of the path.
    fn apply_predicate(&mut self, element: NodeId) {
        let Some((attribute, name, literal)) = self.path.predicate_constraint() else {
            return;
        };
        if attribute {
            self.tree.set_attribute(element, &name, &literal);
        } else {
            let child = self.tree.create_element(&name);
            if !literal.is_empty() {
                let text = self.tree.create_text(&literal);
                self.tree.append_child(child, text);
            }
            self.tree.append_child(element, child);
        }
    }
}

fn resolve(cursor: Cursor, created: &[NodeId]) -> NodeId {
    match cursor {
        Cursor::Existing(node) => node,
        Cursor::Planned(index) => created[index],
    }
}
