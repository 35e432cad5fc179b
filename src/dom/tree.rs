// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! DOM Tree (arena-based allocation)

use std::cmp::Ordering;

use crate::dom::{Node, NodeData, NodeId, NodeKind};

/// Arena-based XML tree.
///
/// Slot 0 always holds the document node. Detached nodes stay in the arena with
/// `parent == None` until they are discarded; a discarded subtree's slots go on a
/// free list and are handed out again under a new generation, so a stale id
/// resolves to nothing.
#[derive(Debug, Clone)]
pub struct DomTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only a document node
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(NodeData::Document)),
            }],
            free: Vec::new(),
        }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// Number of live nodes, detached ones included
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of arena slots, free ones included
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.attributes.as_slice()).unwrap_or(&[])
    }

    /// Element children only
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.kind(*c) == Some(NodeKind::Element))
    }

    /// First element child of the document node
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }

    /// Topmost ancestor of `id`: the document node for attached nodes, the detached
    /// subtree root otherwise. Attributes climb through their owner element.
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::new(NodeData::Element {
            name: name.to_string(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(content.to_string())))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(content.to_string())))
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.push(Node::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.node = Some(node);
                return NodeId::new(index, slot.generation);
            }
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId::new(index, 0)
    }

    /// Append `child` as last child of `parent`, detaching it from any previous parent.
    /// Returns false when either id is unknown or `child` is an attribute.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return false;
        }
        if self.kind(child) == Some(NodeKind::Attribute) {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Put `replacement` at the position of `old` and detach `old`.
    pub fn replace_child(&mut self, old: NodeId, replacement: NodeId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        if self.kind(old) == Some(NodeKind::Attribute) {
            return false;
        }
        self.detach(replacement);
        let Some(position) = self.children(parent).iter().position(|c| *c == old) else {
            return false;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children[position] = replacement;
        }
        if let Some(r) = self.get_mut(replacement) {
            r.parent = Some(parent);
        }
        if let Some(o) = self.get_mut(old) {
            o.parent = None;
        }
        true
    }

    /// Remove a node (or attribute) from its parent. A no-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
            p.attributes.retain(|a| *a != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Detach `id` and release it with its attributes and descendants. Ids of the
    /// released nodes no longer resolve. The document node cannot be discarded.
    pub fn discard(&mut self, id: NodeId) {
        if id == NodeId::ROOT || !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self.slots.get_mut(current.index()) else {
                continue;
            };
            if slot.generation != current.generation() {
                continue;
            }
            if let Some(node) = slot.node.take() {
                pending.extend(node.attributes);
                pending.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index() as u32);
            }
        }
    }

    /// Attribute node of `element` named `name`
    pub fn attribute(&self, element: NodeId, name: &str) -> Option<NodeId> {
        self.attributes(element)
            .iter()
            .copied()
            .find(|a| self.name(*a) == Some(name))
    }

    pub fn attribute_value(&self, element: NodeId, name: &str) -> Option<&str> {
        let attr = self.attribute(element, name)?;
        match &self.get(attr)?.data {
            NodeData::Attribute { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Set (or create) an attribute on an element and return the attribute node.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Option<NodeId> {
        if self.kind(element) != Some(NodeKind::Element) {
            return None;
        }
        if let Some(existing) = self.attribute(element, name) {
            if let Some(Node {
                data: NodeData::Attribute { value: v, .. },
                ..
            }) = self.get_mut(existing)
            {
                *v = value.to_string();
            }
            return Some(existing);
        }
        let mut node = Node::new(NodeData::Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
        node.parent = Some(element);
        let id = self.push(node);
        if let Some(e) = self.get_mut(element) {
            e.attributes.push(id);
        }
        Some(id)
    }

    /// Rename an element or attribute
    pub fn rename(&mut self, id: NodeId, new_name: &str) {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element { name }) | Some(NodeData::Attribute { name, .. }) => {
                *name = new_name.to_string();
            }
            _ => {}
        }
    }

    /// XPath string-value of a node: concatenated descendant text for documents and
    /// elements, the value for attributes, the content for text and comments.
    pub fn string_value(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.data {
            NodeData::Document | NodeData::Element { .. } => {
                let mut out = String::new();
                self.collect_text(id, &mut out);
                out
            }
            NodeData::Attribute { value, .. } => value.clone(),
            NodeData::Text(t) | NodeData::Comment(t) => t.clone(),
            NodeData::ProcessingInstruction { data, .. } => data.clone(),
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.get(*child).map(|n| &n.data) {
                Some(NodeData::Text(t)) => out.push_str(t),
                Some(NodeData::Element { .. }) => self.collect_text(*child, out),
                _ => {}
            }
        }
    }

    /// DOM `setTextContent`: elements lose all children and get a single text node
    /// (none for empty text); attributes and character nodes get their value replaced.
    /// A lone text child is overwritten in place, other children are discarded.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let Some(kind) = self.kind(id) else {
            return;
        };
        match kind {
            NodeKind::Element | NodeKind::Document => {
                let target = if kind == NodeKind::Document {
                    match self.document_element() {
                        Some(element) => element,
                        None => return,
                    }
                } else {
                    id
                };
                let old: Vec<NodeId> = self.children(target).to_vec();
                if let &[single] = old.as_slice() {
                    if !text.is_empty() && self.kind(single) == Some(NodeKind::Text) {
                        if let Some(Node {
                            data: NodeData::Text(t),
                            ..
                        }) = self.get_mut(single)
                        {
                            *t = text.to_string();
                        }
                        return;
                    }
                }
                for child in old {
                    self.discard(child);
                }
                if !text.is_empty() {
                    let t = self.create_text(text);
                    self.append_child(target, t);
                }
            }
            _ => {
                if let Some(node) = self.get_mut(id) {
                    match &mut node.data {
                        NodeData::Attribute { value, .. } => *value = text.to_string(),
                        NodeData::Text(t) | NodeData::Comment(t) => *t = text.to_string(),
                        NodeData::ProcessingInstruction { data, .. } => *data = text.to_string(),
                        _ => {}
                    }
                }
            }
        }
    }

    /// Deep copy of `source_id` from `source` into this tree, detached.
    pub fn import_subtree(&mut self, source: &DomTree, source_id: NodeId) -> Option<NodeId> {
        let node = source.get(source_id)?;
        let copy = match &node.data {
            // A document imports as its document element
            NodeData::Document => {
                let element = source.document_element()?;
                return self.import_subtree(source, element);
            }
            data => self.push(Node::new(data.clone())),
        };
        for attr in source.attributes(source_id) {
            if let Some(NodeData::Attribute { name, value }) = source.get(*attr).map(|n| &n.data) {
                self.set_attribute(copy, name, value);
            }
        }
        for child in source.children(source_id) {
            if let Some(c) = self.import_subtree(source, *child) {
                self.append_child(copy, c);
            }
        }
        Some(copy)
    }

    /// Extract a subtree into a standalone tree whose document element is the copy.
    pub fn fragment(&self, id: NodeId) -> Option<DomTree> {
        let mut fragment = DomTree::new();
        let copy = fragment.import_subtree(self, id)?;
        if fragment.kind(copy) == Some(NodeKind::Element) {
            fragment.append_child(NodeId::ROOT, copy);
        }
        Some(fragment)
    }

    /// Depth-first descendants of `id` in document order (not including `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Compare two nodes by document order. Attributes sort after their owner and
    /// before its children. Nodes of unrelated detached subtrees compare by id.
    pub fn document_order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let path_a = self.order_path(a);
        let path_b = self.order_path(b);
        if path_a.first().map(|p| p.0) != path_b.first().map(|p| p.0) {
            return a.cmp(&b);
        }
        path_a
            .iter()
            .map(|p| p.1)
            .cmp(path_b.iter().map(|p| p.1))
    }

    /// (root, position) chain from the tree root down to `id`
    fn order_path(&self, id: NodeId) -> Vec<(NodeId, usize)> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let attrs = self.attributes(parent);
            let position = match attrs.iter().position(|a| *a == current) {
                Some(i) => i + 1,
                None => {
                    let i = self
                        .children(parent)
                        .iter()
                        .position(|c| *c == current)
                        .unwrap_or(0);
                    attrs.len() + 1 + i
                }
            };
            path.push((parent, position));
            current = parent;
        }
        path.push((current, 0));
        path.reverse();
        path
    }
}
