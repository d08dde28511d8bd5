//! Registration DSL for flat ABI binding modules.
//!
//! A [`Module`] wraps an open registry over one native library. Builders
//! select native overloads, attach adaptation hints, and hand declarations to
//! the registry; [`Module::finalize`] closes the module.
//!
//! ```text
//! Module::new(name, library) -> register_*() builders -> finalize() -> FinalizedModule
//! ```
//!
//! Builders never abort the module: a failed member is recorded in the
//! module's diagnostics and the rest of the class still registers.

mod class_builder;
mod enum_builder;
mod function_builder;
mod module;

pub use class_builder::ClassBuilder;
pub use enum_builder::EnumBuilder;
pub use function_builder::FunctionBuilder;
pub use module::Module;
