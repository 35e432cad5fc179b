// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Conversion between node text and declared value types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::ConversionError;
use crate::types::{Value, ValueType};

/// Conversion for a type the converter does not know natively.
///
/// Registered on a [`TypeConverter`] under a type name and used for every
/// `custom<Name>` parameter or return type.
pub trait CustomConversion: Send + Sync {
    /// Parse node text. Only called for non-blank text; absence reads as `Null`.
    fn from_text(&self, text: &str) -> Result<serde_json::Value, ConversionError>;

    /// Render a value for writing into the document.
    fn to_text(&self, value: &serde_json::Value) -> Result<String, ConversionError>;
}

/// Converts node text into host values and back.
#[derive(Clone, Default)]
pub struct TypeConverter {
    custom: HashMap<String, Arc<dyn CustomConversion>>,
}

impl fmt::Debug for TypeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.custom.keys().collect();
        names.sort();
        f.debug_struct("TypeConverter")
            .field("custom", &names)
            .finish()
    }
}

impl TypeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the conversion for `custom<type_name>`.
    pub fn register(&mut self, type_name: &str, conversion: Arc<dyn CustomConversion>) {
        self.custom.insert(type_name.to_string(), conversion);
    }

    /// True when values of `ty` can be produced from node text.
    pub fn is_convertible(&self, ty: &ValueType) -> bool {
        match ty {
            ValueType::Custom(name) => self.custom.contains_key(name),
            ValueType::Enum { .. } | ValueType::String => true,
            other => other.is_primitive(),
        }
    }

    /// Value returned when a read matches nothing.
    pub fn zero_value(&self, ty: &ValueType) -> Value {
        match ty {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Char => Value::Char('\0'),
            ValueType::Byte => Value::Byte(0),
            ValueType::Short => Value::Short(0),
            ValueType::Int => Value::Int(0),
            ValueType::Long => Value::Long(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Double => Value::Double(0.0),
            ValueType::String => Value::String(String::new()),
            ValueType::List(_) => Value::List(Vec::new()),
            ValueType::Void => Value::Unit,
            ValueType::Enum { .. }
            | ValueType::Custom(_)
            | ValueType::Projection(_)
            | ValueType::Node => Value::Null,
        }
    }

    /// Convert node text into a value of `ty`.
    ///
    /// Blank text reads as the zero value for primitives and `Null` for enums and
    /// custom types. Text that cannot be parsed is an error.
    pub fn to_host_value(&self, text: &str, ty: &ValueType) -> Result<Value, ConversionError> {
        if matches!(ty, ValueType::String) {
            return Ok(Value::String(text.to_string()));
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(self.zero_value(ty));
        }
        let unparsable = || ConversionError::Unparsable {
            text: text.to_string(),
            target: ty.to_string(),
        };

        let value = match ty {
            ValueType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Boolean(true),
                "false" | "0" => Value::Boolean(false),
                _ => return Err(unparsable()),
            },
            ValueType::Char => Value::Char(trimmed.chars().next().ok_or_else(unparsable)?),
            ValueType::Byte => Value::Byte(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Short => Value::Short(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Int => Value::Int(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Long => Value::Long(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Float => Value::Float(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Double => Value::Double(trimmed.parse().map_err(|_| unparsable())?),
            ValueType::Enum { name, variants } => {
                if !variants.iter().any(|v| v == trimmed) {
                    return Err(ConversionError::UnknownEnumVariant {
                        enum_name: name.clone(),
                        variant: trimmed.to_string(),
                    });
                }
                Value::Enum {
                    type_name: name.clone(),
                    variant: trimmed.to_string(),
                }
            }
            ValueType::Custom(name) => {
                let conversion = self
                    .custom
                    .get(name)
                    .ok_or_else(|| ConversionError::UnsupportedType(ty.to_string()))?;
                Value::Custom {
                    type_name: name.clone(),
                    value: conversion.from_text(trimmed)?,
                }
            }
            other => return Err(ConversionError::UnsupportedType(other.to_string())),
        };
        Ok(value)
    }

    /// Convert a numeric selector result (`count(..)`, arithmetic) into `ty`.
    ///
    /// `NaN` (for example arithmetic over a missing node) reads as the zero value.
    /// Integral targets truncate towards zero.
    pub fn from_number(&self, number: f64, ty: &ValueType) -> Result<Value, ConversionError> {
        if number.is_nan() && ty.is_primitive() {
            return Ok(self.zero_value(ty));
        }
        let value = match ty {
            ValueType::Boolean => Value::Boolean(number != 0.0),
            ValueType::Byte => Value::Byte(number as i8),
            ValueType::Short => Value::Short(number as i16),
            ValueType::Int => Value::Int(number as i32),
            ValueType::Long => Value::Long(number as i64),
            ValueType::Float => Value::Float(number as f32),
            ValueType::Double => Value::Double(number),
            _ => return self.to_host_value(&crate::backends::xpath::number_to_string(number), ty),
        };
        Ok(value)
    }

    /// Convert a boolean selector result into `ty`.
    pub fn from_boolean(&self, flag: bool, ty: &ValueType) -> Result<Value, ConversionError> {
        match ty {
            ValueType::Boolean => Ok(Value::Boolean(flag)),
            ty if ty.is_primitive() => self.from_number(if flag { 1.0 } else { 0.0 }, ty),
            _ => self.to_host_value(if flag { "true" } else { "false" }, ty),
        }
    }

    /// Render a scalar value as node text for writing.
    ///
    /// `Null` writes empty text. Projections, nodes and lists are not text and are
    /// handled by the write path itself.
    pub fn to_node_text(&self, value: &Value) -> Result<String, ConversionError> {
        match value {
            Value::Null | Value::Unit => Ok(String::new()),
            Value::Custom { type_name, value } => {
                let conversion = self
                    .custom
                    .get(type_name)
                    .ok_or_else(|| ConversionError::UnsupportedType(format!("custom<{}>", type_name)))?;
                conversion.to_text(value)
            }
            Value::Projection(_) | Value::Node(_) | Value::List(_) => {
                Err(ConversionError::UnsupportedValue {
                    value_kind: value.kind_name().to_string(),
                    reason: "only scalar values convert to node text".to_string(),
                })
            }
            scalar => Ok(scalar.to_string()),
        }
    }

    /// Check a call argument against its declared parameter type before it is
    /// written, so a mismatch never leaves a half-written tree.
    pub fn coerce_argument(&self, value: &Value, ty: &ValueType) -> Result<Value, ConversionError> {
        let mismatch = || ConversionError::UnsupportedValue {
            value_kind: value.kind_name().to_string(),
            reason: format!("expected {}", ty),
        };
        match (ty, value) {
            (_, Value::Null) => Ok(Value::Null),
            (ValueType::List(item), Value::List(items)) => items
                .iter()
                .map(|v| self.coerce_argument(v, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (ValueType::Projection(_), Value::Projection(_)) | (ValueType::Node, Value::Node(_)) => {
                Ok(value.clone())
            }
            (ValueType::List(_) | ValueType::Projection(_) | ValueType::Node, _) => Err(mismatch()),
            (ValueType::Custom(name), Value::Custom { type_name, .. }) if name == type_name => {
                Ok(value.clone())
            }
            (ValueType::Enum { name, .. }, Value::Enum { type_name, .. }) if name == type_name => {
                Ok(value.clone())
            }
            (ty, value) if ty.is_primitive() || matches!(ty, ValueType::String | ValueType::Enum { .. }) => {
                match value {
                    Value::Projection(_) | Value::Node(_) | Value::List(_) => Err(mismatch()),
                    scalar => self.to_host_value(&self.to_node_text(scalar)?, ty),
                }
            }
            // void or an unregistered custom type: pass through and let the text
            // conversion decide
            _ => Ok(value.clone()),
        }
    }
}
