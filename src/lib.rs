// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // selector evaluator + XML parser/serializer
pub mod config;     // interface descriptors, flags, builder
pub mod dom;        // arena document model
pub mod engine;     // projector, projections, dispatch
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // pluggable collaborators
pub mod types;      // value types and conversion
pub mod utils;
