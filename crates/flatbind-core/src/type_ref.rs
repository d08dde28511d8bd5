//! Flat type references: what a native type becomes after classification.
//!
//! A [`TypeRef`] never denotes a native reference, a template parameter, a
//! defaulted argument, or a by-value type with a non-trivial copy. Those are
//! lowered by an adapter before a `TypeRef` is assigned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AbiHash;
use crate::types::{EnumRepr, Mutability, PrimitiveKind};

/// A classified, boundary-safe type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    Void,
    Primitive { primitive: PrimitiveKind },
    /// Enum travelling as its underlying integer
    Enum { name: String, repr: EnumRepr },
    /// Value class copied by value
    Value { class: String },
    /// Pointer identity of an opaque or incomplete class
    OpaquePointer { class: String, mutability: Mutability },
    /// Owned smart pointer handle
    SmartPointerHandle { class: String },
    /// `(pointer, length)` over primitive elements
    SpanView { element: PrimitiveKind, mutability: Mutability },
    /// `(pointer, length)` over bytes
    StringView,
    /// Out-slot or borrowed pointee
    RawPointer { pointee: Box<TypeRef>, mutability: Mutability },
}

impl TypeRef {
    pub fn primitive(primitive: PrimitiveKind) -> Self {
        TypeRef::Primitive { primitive }
    }

    pub fn value(class: impl Into<String>) -> Self {
        TypeRef::Value { class: class.into() }
    }

    pub fn opaque(class: impl Into<String>, mutability: Mutability) -> Self {
        TypeRef::OpaquePointer {
            class: class.into(),
            mutability,
        }
    }

    pub fn handle(class: impl Into<String>) -> Self {
        TypeRef::SmartPointerHandle { class: class.into() }
    }

    pub fn span(element: PrimitiveKind, mutability: Mutability) -> Self {
        TypeRef::SpanView { element, mutability }
    }

    pub fn raw(pointee: TypeRef, mutability: Mutability) -> Self {
        TypeRef::RawPointer {
            pointee: Box::new(pointee),
            mutability,
        }
    }

    /// Writable pointer to `pointee`, the shape of every out-slot.
    pub fn out_slot(pointee: TypeRef) -> Self {
        TypeRef::raw(pointee, Mutability::Mut)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Views occupy two C slots: pointer and length.
    pub fn is_view(&self) -> bool {
        matches!(self, TypeRef::SpanView { .. } | TypeRef::StringView)
    }

    /// Class entity this reference depends on, if any.
    pub fn referenced_class(&self) -> Option<&str> {
        match self {
            TypeRef::Value { class } | TypeRef::OpaquePointer { class, .. } | TypeRef::SmartPointerHandle { class } => {
                Some(class)
            }
            TypeRef::RawPointer { pointee, .. } => pointee.referenced_class(),
            _ => None,
        }
    }

    /// Enum entity this reference depends on, if any.
    pub fn referenced_enum(&self) -> Option<&str> {
        match self {
            TypeRef::Enum { name, .. } => Some(name),
            TypeRef::RawPointer { pointee, .. } => pointee.referenced_enum(),
            _ => None,
        }
    }

    pub fn abi_hash(&self) -> AbiHash {
        AbiHash::from_name(&self.to_string())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive { primitive } => write!(f, "{primitive}"),
            TypeRef::Enum { name, .. } => write!(f, "{name}"),
            TypeRef::Value { class } => write!(f, "{class}"),
            TypeRef::OpaquePointer { class, mutability } => write!(f, "*{mutability} {class}"),
            TypeRef::SmartPointerHandle { class } => write!(f, "*mut {class}"),
            TypeRef::SpanView { element, mutability } => match mutability {
                Mutability::Const => write!(f, "&[{element}]"),
                Mutability::Mut => write!(f, "&mut [{element}]"),
            },
            TypeRef::StringView => write!(f, "&str"),
            TypeRef::RawPointer { pointee, mutability } => write!(f, "*{mutability} {pointee}"),
        }
    }
}

/// Data flow direction of a flat parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDirection {
    #[default]
    In,
    /// Caller-supplied slot written by the adapter
    Out,
    /// Caller-supplied buffer, read and written
    InOut,
}

/// A flat parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub direction: ParamDirection,
}

impl Param {
    pub fn input(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: ParamDirection::In,
        }
    }

    pub fn output(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: ParamDirection::Out,
        }
    }

    pub fn in_out(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            direction: ParamDirection::InOut,
        }
    }
}

/// Who owns what a function hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Returned by value, nothing to release
    #[default]
    Copied,
    /// Points into storage owned elsewhere
    Borrowed,
    /// Caller must release it through the class destructor
    CallerOwned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_spellings() {
        assert_eq!(TypeRef::primitive(PrimitiveKind::Int32).to_string(), "i32");
        assert_eq!(TypeRef::opaque("ImageSpec", Mutability::Const).to_string(), "*const ImageSpec");
        assert_eq!(TypeRef::span(PrimitiveKind::Float, Mutability::Mut).to_string(), "&mut [f32]");
        assert_eq!(TypeRef::out_slot(TypeRef::StringView).to_string(), "*mut &str");
    }

    #[test]
    fn referenced_entities() {
        let ptr = TypeRef::raw(TypeRef::value("ROI"), Mutability::Const);
        assert_eq!(ptr.referenced_class(), Some("ROI"));
        let e = TypeRef::out_slot(TypeRef::Enum {
            name: "OpenMode".into(),
            repr: EnumRepr::I32,
        });
        assert_eq!(e.referenced_enum(), Some("OpenMode"));
        assert_eq!(TypeRef::StringView.referenced_class(), None);
    }

    #[test]
    fn views_detected() {
        assert!(TypeRef::StringView.is_view());
        assert!(TypeRef::span(PrimitiveKind::Uint8, Mutability::Const).is_view());
        assert!(!TypeRef::value("ROI").is_view());
    }

    #[test]
    fn serde_tagged_by_kind() {
        let json = serde_json::to_value(TypeRef::opaque("ImageSpec", Mutability::Mut)).unwrap();
        assert_eq!(json["kind"], "opaque_pointer");
        assert_eq!(json["class"], "ImageSpec");
        assert_eq!(json["mutability"], "mut");
    }
}
