//! Underlying integer representation of exported enums.

use num_enum::{IntoPrimitive, TryFromPrimitive, TryFromPrimitiveError};
use serde::{Deserialize, Serialize};

use super::PrimitiveKind;

/// Bit width of an enum's underlying integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum IntWidth {
    Bits8 = 8,
    Bits16 = 16,
    Bits32 = 32,
    Bits64 = 64,
}

impl IntWidth {
    pub const fn bits(self) -> u32 {
        self as u32
    }

    pub const fn bytes(self) -> usize {
        self as usize / 8
    }
}

/// Explicit underlying representation: width plus signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumRepr {
    pub width: IntWidth,
    pub signed: bool,
}

impl EnumRepr {
    pub const I32: EnumRepr = EnumRepr::new(IntWidth::Bits32, true);
    pub const U8: EnumRepr = EnumRepr::new(IntWidth::Bits8, false);
    pub const U32: EnumRepr = EnumRepr::new(IntWidth::Bits32, false);

    pub const fn new(width: IntWidth, signed: bool) -> Self {
        Self { width, signed }
    }

    /// Build from a raw bit count (`8`, `16`, `32`, `64`).
    pub fn from_bits(bits: u8, signed: bool) -> Result<Self, TryFromPrimitiveError<IntWidth>> {
        Ok(Self::new(IntWidth::try_from_primitive(bits)?, signed))
    }

    /// Whether `value` is representable in this width and signedness.
    pub fn contains(&self, value: i64) -> bool {
        let bits = self.width.bits();
        if self.signed {
            if bits == 64 {
                return true;
            }
            let bound = 1i64 << (bits - 1);
            (-bound..bound).contains(&value)
        } else {
            if value < 0 {
                return false;
            }
            bits == 64 || value < (1i64 << bits)
        }
    }

    /// The primitive the enum travels as.
    pub const fn primitive(&self) -> PrimitiveKind {
        match (self.width, self.signed) {
            (IntWidth::Bits8, true) => PrimitiveKind::Int8,
            (IntWidth::Bits16, true) => PrimitiveKind::Int16,
            (IntWidth::Bits32, true) => PrimitiveKind::Int32,
            (IntWidth::Bits64, true) => PrimitiveKind::Int64,
            (IntWidth::Bits8, false) => PrimitiveKind::Uint8,
            (IntWidth::Bits16, false) => PrimitiveKind::Uint16,
            (IntWidth::Bits32, false) => PrimitiveKind::Uint32,
            (IntWidth::Bits64, false) => PrimitiveKind::Uint64,
        }
    }
}

impl Default for EnumRepr {
    fn default() -> Self {
        Self::I32
    }
}
