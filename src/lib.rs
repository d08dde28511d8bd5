//! Flat, name-stable ABI descriptors for rich native APIs.
//!
//! `flatbind` turns an overloaded, template- and view-based native interface
//! into a flat interface a code generator can project into any language:
//! primitives, value aggregates of primitives, opaque pointers, and
//! `(pointer, length)` pairs.
//!
//! ```ignore
//! use flatbind::prelude::*;
//!
//! let mut module = Module::new("oiio", &library);
//! module.register_value_class("ROI", "OIIO::ROI").method("contains").build()?;
//! module.register_opaque_class("ImageSpec", "OIIO::ImageSpec").field("width").build()?;
//! let descriptor = module.finalize().emit()?;
//! println!("{}", descriptor.to_json()?);
//! ```
//!
//! The crates underneath:
//!
//! - [`core`]: native symbol model, `TypeRef`, entities, errors, config
//! - [`registry`]: classification, overload selection, adapter synthesis,
//!   layout, the entity registry, and descriptor emission
//! - [`module`]: the fluent registration DSL

pub use flatbind_core as core;
pub use flatbind_module as module;
pub use flatbind_registry as registry;

pub use flatbind_core::{BindingConfig, Diagnostics, RegistrationError, RegistrationErrorKind};
pub use flatbind_module::Module;
pub use flatbind_registry::{EmitError, FinalizedModule, ModuleDescriptor};

pub mod prelude {
    pub use flatbind_core::{
        BindingConfig, ClassTraits, ConstOverloadPolicy, Decomposition, DefaultValue, Diagnostics, EnumRepr,
        FactoryOwnership, Mutability, NativeClass, NativeEnum, NativeFunction, NativeLibrary, NativeParam,
        NativeType, PrimitiveKind, RegistrationError, RegistrationErrorKind, Representation, Selector,
        SmartPointerKind, TypePath, TypeRef,
    };
    pub use flatbind_module::{ClassBuilder, EnumBuilder, FunctionBuilder, Module};
    pub use flatbind_registry::{CallPlan, EmitError, FinalizedModule, FlatArg, FlatValue, ModuleDescriptor, NativeArg, NativeValue};
}
