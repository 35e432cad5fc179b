// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declared types, runtime values and the conversion between them and node text.

mod converter;
mod value;

pub use converter::{CustomConversion, TypeConverter};
pub use value::{Value, ValueType};
