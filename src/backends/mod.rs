// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Default collaborator backends for the projection engine.
//!
//! The engine only talks to the traits in [`crate::traits`]; these modules provide
//! the implementations a [`crate::config::ProjectorBuilder`] installs when nothing
//! else is configured.
//!
//! # Available Backends
//!
//! ## XPath Backend
//! [`xpath::PathEvaluator`] evaluates selector expressions (a pragmatic XPath 1.0
//! subset) against an arena tree.
//!
//! ## XML Backend
//! [`xml::XmlParser`] and [`xml::XmlSerializer`] turn UTF-8 XML text into a
//! [`crate::dom::DomTree`] and back, built on `quick-xml`.
//!
//! # Examples
//!
//! ```rust
//! use the_projector::backends::xml::XmlParser;
//! use the_projector::backends::xpath::PathEvaluator;
//! use the_projector::traits::{DocumentParser, SelectorEvaluator, XPathValue};
//!
//! let tree = XmlParser.parse("<a><b>1</b><b>2</b></a>")?;
//! let count = PathEvaluator::new().evaluate(&tree, tree.root(), "count(/a/b)")?;
//! assert_eq!(count, XPathValue::Number(2.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod xml;
pub mod xpath;
