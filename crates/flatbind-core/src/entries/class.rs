//! Class entities.

use serde::{Deserialize, Serialize};

use crate::native::SmartPointerKind;
use crate::type_ref::TypeRef;

use super::FunctionEntity;

/// How a class crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Copied by value; fields are visible.
    Value,
    /// Only pointer identity crosses; storage stays native.
    OpaqueReference,
    /// Forward-declared; pointers pass through untouched.
    Incomplete,
    /// Handle owning or sharing one target object.
    SmartPointer,
}

impl Representation {
    /// Whether the class may carry constructors, methods, or fields.
    pub const fn accepts_members(self) -> bool {
        matches!(self, Representation::Value | Representation::OpaqueReference)
    }

    /// Whether values of this class are referenced through a pointer.
    pub const fn is_by_pointer(self) -> bool {
        !matches!(self, Representation::Value)
    }
}

/// The class a smart pointer dereferences to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SmartPointerTarget {
    pub class: String,
    pub kind: SmartPointerKind,
}

/// C-compatible size and alignment of a value class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueLayout {
    pub size: usize,
    pub align: usize,
}

/// A field of a value class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldEntity {
    pub name: String,
    pub ty: TypeRef,
    /// Byte offset within the layout
    pub offset: usize,
}

/// An exported class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassEntity {
    pub name: String,
    /// Native spelling, e.g. `OIIO::ImageSpec`
    pub native: String,
    pub representation: Representation,
    pub constructors: Vec<FunctionEntity>,
    /// Methods plus synthesized accessors and lifetime functions, sorted by name
    pub methods: Vec<FunctionEntity>,
    /// Only populated for [`Representation::Value`]
    pub fields: Vec<FieldEntity>,
    pub smart_pointer: Option<SmartPointerTarget>,
    pub layout: Option<ValueLayout>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>, native: impl Into<String>, representation: Representation) -> Self {
        Self {
            name: name.into(),
            native: native.into(),
            representation,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            smart_pointer: None,
            layout: None,
        }
    }

    pub fn with_smart_pointer(mut self, target: impl Into<String>, kind: SmartPointerKind) -> Self {
        self.smart_pointer = Some(SmartPointerTarget {
            class: target.into(),
            kind,
        });
        self
    }

    pub fn find_method(&self, name: &str) -> Option<&FunctionEntity> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn find_constructor(&self, name: &str) -> Option<&FunctionEntity> {
        self.constructors.iter().find(|m| m.name == name)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldEntity> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Constructors first, then methods.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntity> {
        self.constructors.iter().chain(self.methods.iter())
    }

    pub fn is_value(&self) -> bool {
        self.representation == Representation::Value
    }
}
