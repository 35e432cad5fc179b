// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::NodeRef;
use crate::engine::Projection;

/// Declared type of a method parameter or return value.
///
/// Descriptors spell types as strings:
///
/// ```yaml
/// returns: long                      # void, boolean, char, byte, short, int, long,
///                                    # float, double, string, node
/// returns: list<projection<Item>>    # lists of any other type
/// returns: projection<Item>          # sub-projection of another interface
/// returns: enum<Color:RED|GREEN>     # enum by variant name
/// returns: custom<Money>             # registered custom conversion
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum ValueType {
    #[default]
    Void,
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Enum {
        name: String,
        variants: Vec<String>,
    },
    Custom(String),
    Projection(String),
    Node,
    List(Box<ValueType>),
}

impl ValueType {
    pub fn projection(interface: &str) -> Self {
        ValueType::Projection(interface.to_string())
    }

    pub fn list(item: ValueType) -> Self {
        ValueType::List(Box::new(item))
    }

    pub fn enumeration(name: &str, variants: &[&str]) -> Self {
        ValueType::Enum {
            name: name.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ValueType::Void)
    }

    /// bool, char and the numeric types
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueType::Boolean
                | ValueType::Char
                | ValueType::Byte
                | ValueType::Short
                | ValueType::Int
                | ValueType::Long
                | ValueType::Float
                | ValueType::Double
        )
    }

    /// The interface name for projection types
    pub fn projection_interface(&self) -> Option<&str> {
        match self {
            ValueType::Projection(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => write!(f, "void"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Char => write!(f, "char"),
            ValueType::Byte => write!(f, "byte"),
            ValueType::Short => write!(f, "short"),
            ValueType::Int => write!(f, "int"),
            ValueType::Long => write!(f, "long"),
            ValueType::Float => write!(f, "float"),
            ValueType::Double => write!(f, "double"),
            ValueType::String => write!(f, "string"),
            ValueType::Node => write!(f, "node"),
            ValueType::Enum { name, variants } => {
                write!(f, "enum<{}:{}>", name, variants.join("|"))
            }
            ValueType::Custom(name) => write!(f, "custom<{}>", name),
            ValueType::Projection(name) => write!(f, "projection<{}>", name),
            ValueType::List(item) => write!(f, "list<{}>", item),
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let simple = match s {
            "void" | "" => Some(ValueType::Void),
            "boolean" | "bool" => Some(ValueType::Boolean),
            "char" => Some(ValueType::Char),
            "byte" | "i8" => Some(ValueType::Byte),
            "short" | "i16" => Some(ValueType::Short),
            "int" | "i32" => Some(ValueType::Int),
            "long" | "i64" => Some(ValueType::Long),
            "float" | "f32" => Some(ValueType::Float),
            "double" | "f64" => Some(ValueType::Double),
            "string" => Some(ValueType::String),
            "node" => Some(ValueType::Node),
            _ => None,
        };
        if let Some(simple) = simple {
            return Ok(simple);
        }

        let (head, inner) = s
            .split_once('<')
            .and_then(|(head, rest)| rest.strip_suffix('>').map(|inner| (head.trim(), inner.trim())))
            .ok_or_else(|| format!("Unknown value type '{}'", s))?;
        if inner.is_empty() {
            return Err(format!("Value type '{}' is missing its parameter", s));
        }
        match head {
            "list" => Ok(ValueType::list(inner.parse()?)),
            "projection" => Ok(ValueType::Projection(inner.to_string())),
            "custom" => Ok(ValueType::Custom(inner.to_string())),
            "enum" => {
                let (name, variants) = inner
                    .split_once(':')
                    .ok_or_else(|| format!("Enum type '{}' must list its variants", s))?;
                let variants: Vec<String> = variants
                    .split('|')
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                if variants.is_empty() {
                    return Err(format!("Enum type '{}' has no variants", s));
                }
                Ok(ValueType::Enum {
                    name: name.trim().to_string(),
                    variants,
                })
            }
            _ => Err(format!("Unknown value type '{}'", s)),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.to_string()
    }
}

/// A runtime value passed into or returned from a projection method.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of a method without a return value
    Unit,
    /// Absence: no matching sub-projection, enum or custom value
    Null,
    Boolean(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Enum {
        type_name: String,
        variant: String,
    },
    /// Value produced by a registered custom conversion
    Custom {
        type_name: String,
        value: serde_json::Value,
    },
    Projection(Projection),
    Node(NodeRef),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral values widened to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric value widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    pub fn as_projection(&self) -> Option<&Projection> {
        match self {
            Value::Projection(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Enum { .. } => "enum",
            Value::Custom { .. } => "custom",
            Value::Projection(_) => "projection",
            Value::Node(_) => "node",
            Value::List(_) => "list",
        }
    }

    /// JSON rendering for callers outside the crate (the CLI prints this)
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Unit | Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Float(_) | Value::Double(_) => self
                .as_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_) => {
                self.as_i64().map(Json::from).unwrap_or(Json::Null)
            }
            Value::Custom { value, .. } => value.clone(),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            other => Json::String(other.to_string()),
        }
    }
}

/// Stringification used for `{n}` placeholder substitution.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Enum { variant, .. } => write!(f, "{}", variant),
            Value::Custom { value, .. } => match value {
                serde_json::Value::String(s) => write!(f, "{}", s),
                other => write!(f, "{}", other),
            },
            Value::Projection(p) => write!(f, "{}", p),
            Value::Node(n) => write!(f, "{}", n.text_content()),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from!(
    bool => Boolean,
    char => Char,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Projection => Projection,
    NodeRef => Node,
    Vec<Value> => List,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
