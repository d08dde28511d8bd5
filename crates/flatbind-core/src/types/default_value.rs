use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A native default argument value, supplied by adapters when a simplified
/// entity omits the parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(OrderedFloat<f64>),
    /// Enumerator, spelled with its qualified name
    Enum(String),
    /// String literal for string-like parameters
    String(String),
    NullPointer,
}

impl DefaultValue {
    pub fn float(v: f64) -> Self {
        DefaultValue::Float(OrderedFloat(v))
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(v) => write!(f, "{v}"),
            DefaultValue::Int(v) => write!(f, "{v}"),
            DefaultValue::Uint(v) => write!(f, "{v}u"),
            DefaultValue::Float(v) => write!(f, "{}", v.0),
            DefaultValue::Enum(v) => write!(f, "{v}"),
            DefaultValue::String(v) => write!(f, "{v:?}"),
            DefaultValue::NullPointer => write!(f, "nullptr"),
        }
    }
}
