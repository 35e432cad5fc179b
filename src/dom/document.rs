// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Document - shared handle over a [`DomTree`]

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dom::{DomTree, NodeId, NodeKind};

/// Shared handle to an XML document.
///
/// Cloning is cheap and every clone sees the same tree; the document lives as long
/// as its longest holder. The tree sits behind an `RwLock`, so single tree
/// operations are safe from any thread. Multi-step projection invocations are only
/// serialized when the projector synchronizes on documents.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

struct DocumentInner {
    tree: RwLock<DomTree>,
    monitor: Mutex<()>,
}

impl Document {
    /// Create an empty document (document node only)
    pub fn new() -> Self {
        Self::from_tree(DomTree::new())
    }

    pub fn from_tree(tree: DomTree) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                tree: RwLock::new(tree),
                monitor: Mutex::new(()),
            }),
        }
    }

    /// Create a document with a detached element named `name`.
    ///
    /// The element is owned by the new document but not appended to it.
    pub fn with_detached_element(name: &str) -> (Self, NodeId) {
        let mut tree = DomTree::new();
        let element = tree.create_element(name);
        (Self::from_tree(tree), element)
    }

    /// Create a document whose document element is an empty element named `name`.
    pub fn with_root_element(name: &str) -> Self {
        let mut tree = DomTree::new();
        let element = tree.create_element(name);
        tree.append_child(NodeId::ROOT, element);
        Self::from_tree(tree)
    }

    /// Shared access to the tree
    pub fn read(&self) -> RwLockReadGuard<'_, DomTree> {
        self.inner
            .tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the tree
    pub fn write(&self) -> RwLockWriteGuard<'_, DomTree> {
        self.inner
            .tree
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Document node handle
    pub fn root(&self) -> NodeRef {
        NodeRef::new(self.clone(), NodeId::ROOT)
    }

    /// Document element handle, if the document has one
    pub fn document_element(&self) -> Option<NodeRef> {
        let element = self.read().document_element()?;
        Some(NodeRef::new(self.clone(), element))
    }

    /// True when both handles point at the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Stable identity key for the lifetime of the document
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Lock used by synchronized projectors to serialize invocations
    pub(crate) fn monitor(&self) -> &Mutex<()> {
        &self.inner.monitor
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("key", &format_args!("{:#x}", self.key()))
            .field("nodes", &self.inner.tree.try_read().map(|t| t.len()).ok())
            .finish()
    }
}

/// A node inside a shared document.
///
/// Equality is identity (same document, same id). Structural comparison lives in
/// [`crate::dom::nodes_are_equal`].
#[derive(Clone)]
pub struct NodeRef {
    document: Document,
    id: NodeId,
}

impl NodeRef {
    pub fn new(document: Document, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owner document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.document.read().kind(self.id)
    }

    pub fn name(&self) -> Option<String> {
        self.document.read().name(self.id).map(str::to_string)
    }

    pub fn text_content(&self) -> String {
        self.document.read().string_value(self.id)
    }

    pub fn set_text_content(&self, text: &str) {
        self.document.write().set_text_content(self.id, text);
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.document
            .read()
            .attribute_value(self.id, name)
            .map(str::to_string)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Option<NodeRef> {
        let attr = self.document.write().set_attribute(self.id, name, value)?;
        Some(NodeRef::new(self.document.clone(), attr))
    }

    /// Create an element and append it as last child of this node
    pub fn append_element(&self, name: &str) -> Option<NodeRef> {
        let mut tree = self.document.write();
        let element = tree.create_element(name);
        if !tree.append_child(self.id, element) {
            return None;
        }
        Some(NodeRef::new(self.document.clone(), element))
    }

    pub fn parent(&self) -> Option<NodeRef> {
        let parent = self.document.read().parent(self.id)?;
        Some(NodeRef::new(self.document.clone(), parent))
    }

    pub fn detach(&self) {
        self.document.write().detach(self.id);
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.document.ptr_eq(&other.document)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("document", &format_args!("{:#x}", self.document.key()))
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_tree() {
        let document = Document::new();
        let other = document.clone();
        let root = document.root();
        let a = root.append_element("a").unwrap();
        a.set_text_content("hello");
        assert_eq!(other.document_element().unwrap(), a);
        assert_eq!(other.root().text_content(), "hello");
        assert!(document.ptr_eq(&other));
    }

    #[test]
    fn test_detached_element_is_not_document_element() {
        let (document, element) = Document::with_detached_element("item");
        assert!(document.document_element().is_none());
        assert_eq!(document.read().name(element), Some("item"));
    }

    #[test]
    fn test_root_element() {
        let document = Document::with_root_element("config");
        let element = document.document_element().unwrap();
        assert_eq!(element.name().as_deref(), Some("config"));
        assert_eq!(element.parent(), Some(document.root()));
    }

    #[test]
    fn test_node_ref_equality_is_identity() {
        let first = Document::new();
        let second = Document::new();
        assert_ne!(first.root(), second.root());
        assert_eq!(first.root(), first.clone().root());
    }
}
