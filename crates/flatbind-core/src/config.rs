//! Binding configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```
//! use flatbind_core::{BindingConfig, ConstOverloadPolicy};
//!
//! let config = BindingConfig::from_json(r#"{ "symbol_prefix": "oiio" }"#).unwrap();
//! assert_eq!(config.symbol_prefix.as_deref(), Some("oiio"));
//! assert_eq!(config.const_overloads, ConstOverloadPolicy::ExposeBoth);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do when both a `const` and a non-`const` overload of the same
/// signature are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstOverloadPolicy {
    /// Keep both; they need distinct exported names.
    #[default]
    ExposeBoth,
    /// Drop the non-`const` twin at finalize.
    PreferConst,
    /// Drop the `const` twin at finalize.
    PreferMutable,
}

/// What factory functions hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryOwnership {
    /// A smart pointer handle; raw owning pointers are adopted.
    #[default]
    SmartPointer,
    /// A caller-owned opaque pointer released through `_delete`.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingConfig {
    /// Prefix of every C symbol; the module name when unset
    pub symbol_prefix: Option<String>,
    pub const_overloads: ConstOverloadPolicy,
    pub factory_ownership: FactoryOwnership,
    /// Name of the out-slot receiving a returned view or string
    pub result_slot: ResultSlot,
}

/// Out-slot name wrapper so the default is `result`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSlot(pub String);

impl Default for ResultSlot {
    fn default() -> Self {
        ResultSlot("result".to_string())
    }
}

impl ResultSlot {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl BindingConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BindingConfig = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn with_symbol_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.symbol_prefix = Some(prefix.into());
        self
    }

    pub fn with_const_overloads(mut self, policy: ConstOverloadPolicy) -> Self {
        self.const_overloads = policy;
        self
    }

    pub fn with_factory_ownership(mut self, ownership: FactoryOwnership) -> Self {
        self.factory_ownership = ownership;
        self
    }

    /// Prefix to use for a module named `module`.
    pub fn prefix_for<'a>(&'a self, module: &'a str) -> &'a str {
        self.symbol_prefix.as_deref().unwrap_or(module)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if let Some(prefix) = &self.symbol_prefix {
            let mut chars = prefix.chars();
            let valid_start = chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
            if !valid_start || !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidPrefix(prefix.clone()));
            }
        }
        Ok(self)
    }
}
