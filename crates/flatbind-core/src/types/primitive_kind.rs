//! Primitive kinds that cross the boundary unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of a native pointer on the build host.
pub const POINTER_SIZE: usize = std::mem::size_of::<usize>();

/// Primitive numeric and boolean kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    /// `size_t`
    Usize,
    /// `ptrdiff_t` / `stride_t`
    Isize,
}

impl PrimitiveKind {
    /// Flat-side spelling.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "c_char",
            PrimitiveKind::Int8 => "i8",
            PrimitiveKind::Int16 => "i16",
            PrimitiveKind::Int32 => "i32",
            PrimitiveKind::Int64 => "i64",
            PrimitiveKind::Uint8 => "u8",
            PrimitiveKind::Uint16 => "u16",
            PrimitiveKind::Uint32 => "u32",
            PrimitiveKind::Uint64 => "u64",
            PrimitiveKind::Float => "f32",
            PrimitiveKind::Double => "f64",
            PrimitiveKind::Usize => "usize",
            PrimitiveKind::Isize => "isize",
        }
    }

    /// Native-side spelling, used in selector descriptions.
    pub const fn native_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int8 => "int8_t",
            PrimitiveKind::Int16 => "int16_t",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "int64_t",
            PrimitiveKind::Uint8 => "uint8_t",
            PrimitiveKind::Uint16 => "uint16_t",
            PrimitiveKind::Uint32 => "unsigned int",
            PrimitiveKind::Uint64 => "uint64_t",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Usize => "size_t",
            PrimitiveKind::Isize => "ptrdiff_t",
        }
    }

    /// Size in bytes.
    pub const fn size(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::Char | PrimitiveKind::Int8 | PrimitiveKind::Uint8 => 1,
            PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
            PrimitiveKind::Usize | PrimitiveKind::Isize => POINTER_SIZE,
        }
    }

    /// Alignment in bytes. Primitives are naturally aligned.
    pub const fn align(self) -> usize {
        self.size()
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, PrimitiveKind::Bool | PrimitiveKind::Float | PrimitiveKind::Double)
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Char
                | PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Isize
                | PrimitiveKind::Float
                | PrimitiveKind::Double
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
