use serde::{Deserialize, Serialize};

use crate::AbiHash;
use crate::type_ref::{Ownership, Param, TypeRef};
use crate::types::Mutability;

use super::AdapterBody;

/// Role of a function entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Free,
    Method,
    Constructor,
    FieldGetter,
    FieldSetter,
    Destructor,
    /// Smart pointer to its target
    Dereference,
}

/// The object a method is invoked on, passed as `_this`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Receiver {
    pub class: String,
    pub mutability: Mutability,
}

impl Receiver {
    pub fn new(class: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            class: class.into(),
            mutability,
        }
    }
}

/// An exported function, method, constructor, or synthesized lifetime helper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionEntity {
    /// Exported name, unique within the owner
    pub name: String,
    /// Owning class; `None` for free functions
    pub owner: Option<String>,
    /// C symbol, assigned at finalize
    pub symbol: String,
    pub kind: FunctionKind,
    /// The native overload or instantiation this entity calls
    pub native_selector: String,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub returns: TypeRef,
    pub ownership: Ownership,
    /// Present when the native signature is not already flat
    pub adapter: Option<AdapterBody>,
    pub abi_hash: AbiHash,
}

/// Methods share the function entity shape.
pub type MethodEntity = FunctionEntity;

/// Constructors share the function entity shape.
pub type ConstructorEntity = FunctionEntity;

impl FunctionEntity {
    pub fn new(name: impl Into<String>, kind: FunctionKind, native_selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            symbol: String::new(),
            kind,
            native_selector: native_selector.into(),
            receiver: None,
            params: Vec::new(),
            returns: TypeRef::Void,
            ownership: Ownership::Copied,
            adapter: None,
            abi_hash: AbiHash::EMPTY,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_return(mut self, returns: TypeRef, ownership: Ownership) -> Self {
        self.returns = returns;
        self.ownership = ownership;
        self
    }

    pub fn with_adapter(mut self, adapter: AdapterBody) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Module-wide key: `Class_name` for members, `name` for free functions.
    pub fn export_key(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}_{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_member(&self) -> bool {
        self.owner.is_some()
    }

    /// Classes this entity mentions in its receiver, parameters, or return.
    pub fn referenced_classes(&self) -> impl Iterator<Item = &str> {
        self.receiver
            .iter()
            .map(|r| r.class.as_str())
            .chain(self.params.iter().filter_map(|p| p.ty.referenced_class()))
            .chain(self.returns.referenced_class())
    }

    /// Enums this entity mentions in its parameters or return.
    pub fn referenced_enums(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter_map(|p| p.ty.referenced_enum())
            .chain(self.returns.referenced_enum())
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}
