//! Core data model for flat ABI binding descriptors.
//!
//! This crate holds the types shared by the registry and the registration
//! DSL:
//!
//! - [`native`]: the wrapped library's symbol table (input)
//! - [`TypeRef`]: classified, boundary-safe type references
//! - [`entries`]: exported classes, enums, and functions with adapter bodies
//! - [`RegistrationError`] / [`Diagnostics`]: per-entity failures
//! - [`BindingConfig`]: symbol prefix and policy knobs
//! - [`AbiHash`]: deterministic signature fingerprints

pub mod abi_hash;
pub mod config;
pub mod diagnostics;
pub mod entries;
pub mod error;
pub mod native;
pub mod qualified_name;
pub mod type_ref;
pub mod types;

pub use abi_hash::AbiHash;
pub use config::{BindingConfig, ConstOverloadPolicy, FactoryOwnership, ResultSlot};
pub use diagnostics::Diagnostics;
pub use entries::{
    AdapterBody, ClassEntity, ConstructorEntity, Decomposition, Entity, EnumEntity, EnumVariant, FieldEntity,
    FieldRoute, FunctionEntity, FunctionKind, MethodEntity, NativeCall, OutputRule, ParamLowering, Receiver,
    Representation, Route, RouteTarget, SmartPointerTarget, ValueLayout,
};
pub use error::{ConfigError, RegistrationError, RegistrationErrorKind, Slot};
pub use native::{
    NativeClass, NativeEnum, NativeField, NativeFunction, NativeLibrary, NativeParam, NativeType, Selector,
    SmartPointerKind, TypePath,
};
pub use qualified_name::QualifiedName;
pub use type_ref::{Ownership, Param, ParamDirection, TypeRef};
pub use types::{
    ClassTraits, DefaultValue, EnumRepr, IntWidth, MethodQualifiers, Mutability, POINTER_SIZE, PrimitiveKind,
    ScalarValue,
};
