// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use crate::backends::xml::{XmlParser, XmlSerializer};
use crate::backends::xpath::PathEvaluator;
use crate::config::{load_projector_config, Flag, ProjectionInterface, ProjectorConfig};
use crate::engine::Projector;
use crate::errors::ProjectionResult;
use crate::traits::{DocumentParser, DocumentSerializer, SelectorEvaluator};
use crate::types::{CustomConversion, TypeConverter};

/// Projector builder - assembles a [`Projector`] from configuration and pluggable
/// collaborators.
///
/// Anything not set explicitly falls back to the built-in backends: the XPath
/// subset evaluator, the quick-xml parser and serializer, and a type converter
/// without custom conversions.
///
/// # Examples
///
/// ## Building a projector from configuration
/// ```
/// use the_projector::config::{Flag, ProjectorBuilder, ProjectorConfig};
///
/// let config = ProjectorConfig::default().with_flag(Flag::SynchronizeOnDocuments);
/// let projector = ProjectorBuilder::from_config(config).build();
///
/// assert!(projector.has_flag(Flag::SynchronizeOnDocuments));
/// ```
#[derive(Default)]
pub struct ProjectorBuilder {
    config: ProjectorConfig,
    evaluator: Option<Arc<dyn SelectorEvaluator>>,
    parser: Option<Arc<dyn DocumentParser>>,
    serializer: Option<Arc<dyn DocumentSerializer>>,
    converter: TypeConverter,
}

impl ProjectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration; its interfaces are registered on build.
    pub fn from_config(config: ProjectorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start from a YAML or TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ProjectionResult<Self> {
        Ok(Self::from_config(load_projector_config(path)?))
    }

    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.config = self.config.with_flag(flag);
        self
    }

    pub fn with_interface(mut self, interface: ProjectionInterface) -> Self {
        self.config.interfaces.push(interface);
        self
    }

    pub fn with_interfaces<I>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = ProjectionInterface>,
    {
        self.config.interfaces.extend(interfaces);
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn SelectorEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn DocumentSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Replace the type converter, dropping conversions registered so far.
    pub fn with_type_converter(mut self, converter: TypeConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Register a conversion for `custom<type_name>` values.
    pub fn register_conversion(
        mut self,
        type_name: &str,
        conversion: Arc<dyn CustomConversion>,
    ) -> Self {
        self.converter.register(type_name, conversion);
        self
    }

    /// Build the projector. Interfaces are validated lazily, on first bind.
    pub fn build(self) -> Projector {
        Projector::from_parts(
            self.config,
            self.evaluator
                .unwrap_or_else(|| Arc::new(PathEvaluator::new())),
            self.parser.unwrap_or_else(|| Arc::new(XmlParser)),
            self.serializer.unwrap_or_else(|| Arc::new(XmlSerializer)),
            self.converter,
        )
    }

    /// Build the projector and validate every configured interface up front.
    pub fn build_validated(self) -> ProjectionResult<Projector> {
        let names: Vec<String> = self
            .config
            .interfaces
            .iter()
            .map(|i| i.name.clone())
            .collect();
        let projector = self.build();
        for name in &names {
            projector.validate(name)?;
        }
        Ok(projector)
    }
}
