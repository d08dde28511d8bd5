//! Enum entities.

use serde::{Deserialize, Serialize};

use crate::types::EnumRepr;

/// A named enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    pub value: i64,
}

/// An exported enum. Mirrors the native enum value for value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumEntity {
    pub name: String,
    pub native: String,
    pub repr: EnumRepr,
    pub variants: Vec<EnumVariant>,
}

impl EnumEntity {
    pub fn new(name: impl Into<String>, native: impl Into<String>, repr: EnumRepr) -> Self {
        Self {
            name: name.into(),
            native: native.into(),
            repr,
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.variants.push(EnumVariant {
            name: name.into(),
            value,
        });
        self
    }

    /// Look up a value by name.
    pub fn get_value(&self, name: &str) -> Option<i64> {
        self.variants.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Look up a name by value.
    pub fn get_name(&self, value: i64) -> Option<&str> {
        self.variants
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_entity_lookup() {
        let entity = EnumEntity::new("SerialFormat", "OIIO::ImageSpec::SerialFormat", EnumRepr::I32)
            .with_variant("SerialText", 0)
            .with_variant("SerialXML", 1);

        assert_eq!(entity.get_value("SerialXML"), Some(1));
        assert_eq!(entity.get_value("SerialJSON"), None);
        assert_eq!(entity.get_name(0), Some("SerialText"));
        assert_eq!(entity.get_name(7), None);
    }
}
