// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod template;

pub use template::{format_placeholders, has_placeholders};
