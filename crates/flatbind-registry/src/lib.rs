//! Registry and adapter synthesis for flat ABI bindings.
//!
//! Declarations ([`decl`]) carry what the author asked for with native
//! overloads already selected ([`overload`]). The [`EntityRegistry`] collects
//! them; finalizing classifies every type ([`classifier`]), computes value
//! class layouts ([`layout`]), synthesizes adapters ([`adapter`]), and
//! produces a [`ModuleDescriptor`] that projects to C ([`abi`]).

pub mod abi;
pub mod adapter;
pub mod classifier;
pub mod decl;
pub mod descriptor;
pub mod instantiation;
pub mod layout;
pub mod overload;
pub mod registry;

pub use abi::{CFunction, CSlot};
pub use adapter::marshal::{CallPlan, FlatArg, FlatOutputs, FlatValue, MarshalError, NativeArg, NativeValue};
pub use adapter::{Owner, Synthesizer};
pub use classifier::{Classification, ClassTable, ClassifyError, ViewSource};
pub use decl::{ClassDecl, EnumDecl, FieldDecl, FunctionDecl, SmartPointerDecl};
pub use descriptor::{EmitError, FinalizedModule, ModuleDescriptor, SmartPointerEntry};
pub use instantiation::InstantiationTable;
pub use layout::{ComputedLayout, FieldValue, LayoutEngine, LayoutError};
pub use overload::{export_name, select_overload};
pub use registry::EntityRegistry;
