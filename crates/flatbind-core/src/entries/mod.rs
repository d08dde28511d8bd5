//! Exported entities.
//!
//! - [`ClassEntity`]: a class with its representation and members
//! - [`EnumEntity`]: an enum with an explicit underlying integer
//! - [`FunctionEntity`]: free functions, methods, constructors, and
//!   synthesized accessors, each with an optional [`AdapterBody`]

mod adapter;
mod class;
mod enum_entity;
mod function;

pub use adapter::{AdapterBody, Decomposition, FieldRoute, NativeCall, OutputRule, ParamLowering, Route, RouteTarget};
pub use class::{ClassEntity, FieldEntity, Representation, SmartPointerTarget, ValueLayout};
pub use enum_entity::{EnumEntity, EnumVariant};
pub use function::{ConstructorEntity, FunctionEntity, FunctionKind, MethodEntity, Receiver};

/// Any top-level entity of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Class(ClassEntity),
    Enum(EnumEntity),
    Function(FunctionEntity),
}

impl Entity {
    /// Module-wide name.
    pub fn name(&self) -> String {
        match self {
            Entity::Class(c) => c.name.clone(),
            Entity::Enum(e) => e.name.clone(),
            Entity::Function(f) => f.export_key(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Class(_) => "class",
            Entity::Enum(_) => "enum",
            Entity::Function(_) => "function",
        }
    }
}

impl From<ClassEntity> for Entity {
    fn from(c: ClassEntity) -> Self {
        Entity::Class(c)
    }
}

impl From<EnumEntity> for Entity {
    fn from(e: EnumEntity) -> Self {
        Entity::Enum(e)
    }
}

impl From<FunctionEntity> for Entity {
    fn from(f: FunctionEntity) -> Self {
        Entity::Function(f)
    }
}
