// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{
    validate_projection_interface, Flag, InterfaceMap, ProjectionInterface, ProjectorBuilder,
    ProjectorConfig,
};
use crate::dom::{Document, NodeKind, NodeRef};
use crate::engine::dispatch::DispatchTable;
use crate::engine::io::ProjectorIo;
use crate::engine::mixins::MixinRegistry;
use crate::engine::Projection;
use crate::errors::{ProjectionError, ProjectionResult, ValidationError};
use crate::observability::messages::binding::{
    InterfaceBound, InterfaceRegistered, InterfaceRejected, ProjectionCreated,
};
use crate::observability::messages::document::DocumentParsed;
use crate::observability::messages::mixin::{MixinRegistered, MixinRemoved};
use crate::observability::messages::StructuredLog;
use crate::traits::{DocumentParser, DocumentSerializer, Mixin, SelectorEvaluator};
use crate::types::{TypeConverter, Value, ValueType};

/// Binds projection interfaces to documents.
///
/// A projector owns the registered interface descriptors, the per-interface
/// dispatch tables (built and cached on first bind), the mixin registry and the
/// collaborators used by every projection it creates: selector evaluator, document
/// parser, serializer and type converter. Cloning is cheap and clones share all of
/// that state.
///
/// # Examples
///
/// ```rust
/// use the_projector::config::{MethodDescriptor, ProjectionInterface};
/// use the_projector::engine::Projector;
/// use the_projector::types::{Value, ValueType};
///
/// let projector = Projector::new();
/// projector.register_interface(
///     ProjectionInterface::new("Book").with_method(
///         MethodDescriptor::new("getTitle")
///             .reading("//title")
///             .returning(ValueType::String),
///     ),
/// );
///
/// let book = projector.parse("<book><title>Dune</title></book>", "Book")?;
/// assert_eq!(book.get("getTitle")?, Value::from("Dune"));
/// # Ok::<(), the_projector::errors::ProjectionError>(())
/// ```
#[derive(Clone)]
pub struct Projector {
    inner: Arc<ProjectorInner>,
}

struct ProjectorInner {
    config: ProjectorConfig,
    interfaces: RwLock<InterfaceMap>,
    bindings: RwLock<HashMap<String, Arc<DispatchTable>>>,
    mixins: MixinRegistry,
    evaluator: Arc<dyn SelectorEvaluator>,
    parser: Arc<dyn DocumentParser>,
    serializer: Arc<dyn DocumentSerializer>,
    converter: TypeConverter,
}

impl Projector {
    /// Projector with default flags and the default backends
    pub fn new() -> Self {
        ProjectorBuilder::new().build()
    }

    pub fn builder() -> ProjectorBuilder {
        ProjectorBuilder::new()
    }

    pub(crate) fn from_parts(
        config: ProjectorConfig,
        evaluator: Arc<dyn SelectorEvaluator>,
        parser: Arc<dyn DocumentParser>,
        serializer: Arc<dyn DocumentSerializer>,
        converter: TypeConverter,
    ) -> Self {
        let projector = Self {
            inner: Arc::new(ProjectorInner {
                config: ProjectorConfig {
                    flags: config.flags,
                    interfaces: Vec::new(),
                },
                interfaces: RwLock::new(InterfaceMap::new()),
                bindings: RwLock::new(HashMap::new()),
                mixins: MixinRegistry::new(),
                evaluator,
                parser,
                serializer,
                converter,
            }),
        };
        projector.register_interfaces(config.interfaces);
        projector
    }

    /// Flags this projector was built with. Interfaces are not kept here; see
    /// [`Projector::interface`].
    pub fn config(&self) -> &ProjectorConfig {
        &self.inner.config
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.inner.config.has_flag(flag)
    }

    /// Register an interface descriptor, replacing one with the same name.
    ///
    /// Replacing drops the cached dispatch table; the next bind validates the new
    /// descriptor. Projections created earlier keep working with the old one.
    pub fn register_interface(&self, interface: ProjectionInterface) -> Arc<ProjectionInterface> {
        let name = interface.name.clone();
        let method_count = interface.methods.len();
        let (registered, replaced) = {
            let mut interfaces = self
                .inner
                .interfaces
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let replaced = interfaces.contains_key(&name);
            (interfaces.insert(interface), replaced)
        };
        self.inner
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name);

        InterfaceRegistered {
            interface: &name,
            method_count,
            replaced,
        }
        .log();
        registered
    }

    pub fn register_interfaces<I>(&self, interfaces: I)
    where
        I: IntoIterator<Item = ProjectionInterface>,
    {
        for interface in interfaces {
            self.register_interface(interface);
        }
    }

    pub fn interface(&self, name: &str) -> Option<Arc<ProjectionInterface>> {
        self.inner
            .interfaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Validate an interface (once) and return its dispatch table.
    pub(crate) fn dispatch_table(&self, name: &str) -> ProjectionResult<Arc<DispatchTable>> {
        if let Some(table) = self
            .inner
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(Arc::clone(table));
        }

        let interface = self.interface(name).ok_or_else(|| {
            ProjectionError::invalid_interface(
                name,
                ValidationError::UnknownInterface {
                    interface: name.to_string(),
                },
            )
        })?;

        let mut errors = validate_projection_interface(&interface)
            .err()
            .unwrap_or_default();
        errors.extend(self.unconvertible_types(&interface));
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            InterfaceRejected {
                interface: name,
                error_count: errors.len(),
                errors: &joined,
            }
            .log();
            return Err(ProjectionError::InvalidInterface {
                interface: name.to_string(),
                errors,
            });
        }

        let table = Arc::new(DispatchTable::build(interface));
        InterfaceBound {
            interface: name,
            operation_count: table.len(),
        }
        .log();

        let mut bindings = self
            .inner
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let table = bindings
            .entry(name.to_string())
            .or_insert(table);
        Ok(Arc::clone(table))
    }

    /// Read results and written values whose scalar type the converter cannot
    /// handle, which for custom types depends on the registered conversions.
    fn unconvertible_types(&self, interface: &ProjectionInterface) -> Vec<ValidationError> {
        let converter = &self.inner.converter;
        interface
            .methods
            .iter()
            .filter_map(|method| {
                let ty = if method.read.is_some() {
                    &method.returns
                } else if method.write.is_some() {
                    &method.params.get(method.value_param_index()?)?.ty
                } else {
                    return None;
                };
                let item = match ty {
                    ValueType::List(item) => item.as_ref(),
                    ty => ty,
                };
                let convertible = match item {
                    ValueType::Void | ValueType::Node | ValueType::Projection(_) | ValueType::List(_) => true,
                    scalar => converter.is_convertible(scalar),
                };
                (!convertible).then(|| ValidationError::UnconvertibleType {
                    interface: interface.name.clone(),
                    method: method.name.clone(),
                    ty: ty.to_string(),
                })
            })
            .collect()
    }

    /// Check that an interface is registered and passes validation.
    pub fn validate(&self, interface: &str) -> ProjectionResult<()> {
        self.dispatch_table(interface).map(|_| ())
    }

    /// Bind `interface` to a document or element node.
    pub fn bind(&self, node: &NodeRef, interface: &str) -> ProjectionResult<Projection> {
        let table = self.dispatch_table(interface)?;
        let kind = node.kind().ok_or_else(|| {
            ProjectionError::IllegalArgument(format!(
                "node {:?} does not belong to its document",
                node.id()
            ))
        })?;
        if !matches!(kind, NodeKind::Document | NodeKind::Element) {
            return Err(ProjectionError::IllegalArgument(format!(
                "only documents and elements can be projected, got {:?}",
                kind
            )));
        }
        ProjectionCreated {
            interface,
            node_kind: if kind == NodeKind::Document {
                "document"
            } else {
                "element"
            },
        }
        .log();
        Ok(Projection::new(table, node.clone(), self.clone()))
    }

    /// Bind `interface` to the document node of `document`.
    pub fn bind_document(&self, document: &Document, interface: &str) -> ProjectionResult<Projection> {
        self.bind(&document.root(), interface)
    }

    /// Bind `interface` to a new, empty document.
    pub fn bind_empty_document(&self, interface: &str) -> ProjectionResult<Projection> {
        self.bind_document(&Document::new(), interface)
    }

    /// Bind `interface` to a new element named `name` owned by a new document.
    /// The element is not attached to its document.
    pub fn bind_empty_element(&self, name: &str, interface: &str) -> ProjectionResult<Projection> {
        let (document, element) = Document::with_detached_element(name);
        self.bind(&NodeRef::new(document, element), interface)
    }

    /// Parse document text with the configured parser and bind `interface` to it.
    pub fn parse(&self, text: &str, interface: &str) -> ProjectionResult<Projection> {
        self.dispatch_table(interface)?;
        let tree = self.inner.parser.parse(text)?;
        DocumentParsed {
            interface,
            bytes: text.len(),
            nodes: tree.len(),
        }
        .log();
        self.bind_document(&Document::from_tree(tree), interface)
    }

    /// Serialize the node behind a projection value.
    ///
    /// Anything but [`Value::Projection`] is an illegal argument.
    pub fn as_string(&self, value: &Value) -> ProjectionResult<String> {
        match value {
            Value::Projection(projection) => Ok(projection.as_string()),
            other => Err(ProjectionError::IllegalArgument(format!(
                "expected a projection, got {}",
                other.kind_name()
            ))),
        }
    }

    /// Serialize a node with the configured serializer.
    pub fn render(&self, node: &NodeRef) -> String {
        let tree = node.document().read();
        self.inner.serializer.render(&tree, node.id())
    }

    /// Mixin registration for this projector.
    pub fn mixins(&self) -> MixinBuilder<'_> {
        MixinBuilder { projector: self }
    }

    /// File based document I/O for this projector.
    pub fn io(&self) -> ProjectorIo<'_> {
        ProjectorIo::new(self)
    }

    pub(crate) fn evaluator(&self) -> &dyn SelectorEvaluator {
        self.inner.evaluator.as_ref()
    }

    pub(crate) fn converter(&self) -> &TypeConverter {
        &self.inner.converter
    }

    pub(crate) fn mixin_registry(&self) -> &MixinRegistry {
        &self.inner.mixins
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector")
            .field("flags", &self.inner.config.flags)
            .field("evaluator", &self.inner.evaluator.name())
            .field("mixins", &self.inner.mixins)
            .finish()
    }
}

/// Adds, looks up and removes mixins for projection interfaces.
pub struct MixinBuilder<'p> {
    projector: &'p Projector,
}

impl<'p> MixinBuilder<'p> {
    /// Register `mixin` for `interface`.
    ///
    /// The interface is validated first. It is an illegal argument when the mixin
    /// shares no capability with the interface.
    pub fn add_projection_mixin(
        &self,
        interface: &str,
        mixin: Arc<dyn Mixin>,
    ) -> ProjectionResult<&'p Projector> {
        let table = self.projector.dispatch_table(interface)?;
        let capabilities = self
            .projector
            .mixin_registry()
            .register(table.interface(), mixin);
        if capabilities.is_empty() {
            return Err(ProjectionError::IllegalArgument(format!(
                "mixin implements none of the interfaces '{}' extends",
                interface
            )));
        }
        MixinRegistered {
            interface,
            capabilities: &capabilities,
        }
        .log();
        Ok(self.projector)
    }

    pub fn get_projection_mixin(&self, interface: &str, capability: &str) -> Option<Arc<dyn Mixin>> {
        self.projector.mixin_registry().lookup(interface, capability)
    }

    pub fn remove_projection_mixin(
        &self,
        interface: &str,
        capability: &str,
    ) -> Option<Arc<dyn Mixin>> {
        let removed = self.projector.mixin_registry().remove(interface, capability);
        if removed.is_some() {
            MixinRemoved {
                interface,
                capability,
            }
            .log();
        }
        removed
    }
}
