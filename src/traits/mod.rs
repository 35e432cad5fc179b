// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod document_io;
pub mod evaluator;
pub mod mixin;

pub use document_io::{DocumentParser, DocumentSerializer};
pub use evaluator::{SelectorEvaluator, XPathValue};
pub use mixin::Mixin;
