// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! XML text <-> [`crate::dom::DomTree`] on top of `quick-xml`.

mod parser;
mod serializer;

pub use parser::XmlParser;
pub use serializer::XmlSerializer;
