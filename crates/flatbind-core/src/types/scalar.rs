//! Typed primitive values and their little-endian byte encoding.
//!
//! Used by value layouts to move field values in and out of a flat buffer,
//! and by marshalling plans to carry primitive arguments.

use std::fmt;

use ordered_float::OrderedFloat;

use super::{POINTER_SIZE, PrimitiveKind};

/// A single primitive value tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarValue {
    Bool(bool),
    Char(i8),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(OrderedFloat<f32>),
    Double(OrderedFloat<f64>),
    Usize(u64),
    Isize(i64),
}

macro_rules! read_array {
    ($bytes:expr, $n:expr) => {{
        let slice = $bytes.get(..$n)?;
        let mut buf = [0u8; $n];
        buf.copy_from_slice(slice);
        buf
    }};
}

impl ScalarValue {
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            ScalarValue::Bool(_) => PrimitiveKind::Bool,
            ScalarValue::Char(_) => PrimitiveKind::Char,
            ScalarValue::Int8(_) => PrimitiveKind::Int8,
            ScalarValue::Int16(_) => PrimitiveKind::Int16,
            ScalarValue::Int32(_) => PrimitiveKind::Int32,
            ScalarValue::Int64(_) => PrimitiveKind::Int64,
            ScalarValue::Uint8(_) => PrimitiveKind::Uint8,
            ScalarValue::Uint16(_) => PrimitiveKind::Uint16,
            ScalarValue::Uint32(_) => PrimitiveKind::Uint32,
            ScalarValue::Uint64(_) => PrimitiveKind::Uint64,
            ScalarValue::Float(_) => PrimitiveKind::Float,
            ScalarValue::Double(_) => PrimitiveKind::Double,
            ScalarValue::Usize(_) => PrimitiveKind::Usize,
            ScalarValue::Isize(_) => PrimitiveKind::Isize,
        }
    }

    /// Zero value of `kind`.
    pub const fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => ScalarValue::Bool(false),
            PrimitiveKind::Char => ScalarValue::Char(0),
            PrimitiveKind::Int8 => ScalarValue::Int8(0),
            PrimitiveKind::Int16 => ScalarValue::Int16(0),
            PrimitiveKind::Int32 => ScalarValue::Int32(0),
            PrimitiveKind::Int64 => ScalarValue::Int64(0),
            PrimitiveKind::Uint8 => ScalarValue::Uint8(0),
            PrimitiveKind::Uint16 => ScalarValue::Uint16(0),
            PrimitiveKind::Uint32 => ScalarValue::Uint32(0),
            PrimitiveKind::Uint64 => ScalarValue::Uint64(0),
            PrimitiveKind::Float => ScalarValue::Float(OrderedFloat(0.0)),
            PrimitiveKind::Double => ScalarValue::Double(OrderedFloat(0.0)),
            PrimitiveKind::Usize => ScalarValue::Usize(0),
            PrimitiveKind::Isize => ScalarValue::Isize(0),
        }
    }

    /// Little-endian bytes, exactly `self.kind().size()` long.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match *self {
            ScalarValue::Bool(v) => vec![u8::from(v)],
            ScalarValue::Char(v) | ScalarValue::Int8(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int16(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int32(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int64(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Uint8(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Uint16(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Uint32(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Uint64(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Float(v) => v.0.to_le_bytes().to_vec(),
            ScalarValue::Double(v) => v.0.to_le_bytes().to_vec(),
            ScalarValue::Usize(v) => v.to_le_bytes()[..POINTER_SIZE].to_vec(),
            ScalarValue::Isize(v) => v.to_le_bytes()[..POINTER_SIZE].to_vec(),
        }
    }

    /// Decode a value of `kind` from the front of `bytes`.
    ///
    /// Returns `None` when `bytes` is too short.
    pub fn from_le_bytes(kind: PrimitiveKind, bytes: &[u8]) -> Option<Self> {
        Some(match kind {
            PrimitiveKind::Bool => ScalarValue::Bool(*bytes.first()? != 0),
            PrimitiveKind::Char => ScalarValue::Char(i8::from_le_bytes(read_array!(bytes, 1))),
            PrimitiveKind::Int8 => ScalarValue::Int8(i8::from_le_bytes(read_array!(bytes, 1))),
            PrimitiveKind::Int16 => ScalarValue::Int16(i16::from_le_bytes(read_array!(bytes, 2))),
            PrimitiveKind::Int32 => ScalarValue::Int32(i32::from_le_bytes(read_array!(bytes, 4))),
            PrimitiveKind::Int64 => ScalarValue::Int64(i64::from_le_bytes(read_array!(bytes, 8))),
            PrimitiveKind::Uint8 => ScalarValue::Uint8(u8::from_le_bytes(read_array!(bytes, 1))),
            PrimitiveKind::Uint16 => ScalarValue::Uint16(u16::from_le_bytes(read_array!(bytes, 2))),
            PrimitiveKind::Uint32 => ScalarValue::Uint32(u32::from_le_bytes(read_array!(bytes, 4))),
            PrimitiveKind::Uint64 => ScalarValue::Uint64(u64::from_le_bytes(read_array!(bytes, 8))),
            PrimitiveKind::Float => ScalarValue::Float(OrderedFloat(f32::from_le_bytes(read_array!(bytes, 4)))),
            PrimitiveKind::Double => ScalarValue::Double(OrderedFloat(f64::from_le_bytes(read_array!(bytes, 8)))),
            PrimitiveKind::Usize => {
                let raw = bytes.get(..POINTER_SIZE)?;
                let mut buf = [0u8; 8];
                buf[..POINTER_SIZE].copy_from_slice(raw);
                ScalarValue::Usize(u64::from_le_bytes(buf))
            }
            PrimitiveKind::Isize => {
                let raw = bytes.get(..POINTER_SIZE)?;
                let mut buf = [0u8; 8];
                buf[..POINTER_SIZE].copy_from_slice(raw);
                // sign-extend narrower pointers
                if POINTER_SIZE < 8 && raw.last().is_some_and(|b| b & 0x80 != 0) {
                    buf[POINTER_SIZE..].fill(0xff);
                }
                ScalarValue::Isize(i64::from_le_bytes(buf))
            }
        })
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(f, "{v}"),
            ScalarValue::Char(v) | ScalarValue::Int8(v) => write!(f, "{v}"),
            ScalarValue::Int16(v) => write!(f, "{v}"),
            ScalarValue::Int32(v) => write!(f, "{v}"),
            ScalarValue::Int64(v) | ScalarValue::Isize(v) => write!(f, "{v}"),
            ScalarValue::Uint8(v) => write!(f, "{v}"),
            ScalarValue::Uint16(v) => write!(f, "{v}"),
            ScalarValue::Uint32(v) => write!(f, "{v}"),
            ScalarValue::Uint64(v) | ScalarValue::Usize(v) => write!(f, "{v}"),
            ScalarValue::Float(v) => write!(f, "{}", v.0),
            ScalarValue::Double(v) => write!(f, "{}", v.0),
        }
    }
}
