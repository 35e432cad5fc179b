// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod conversion;
mod projection;
mod selector;

pub use config::ValidationError;
pub use conversion::ConversionError;
pub use projection::{ProjectionError, ProjectionResult};
pub use selector::SelectorError;
