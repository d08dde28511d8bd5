//! Deterministic hashing of flat signatures.
//!
//! [`AbiHash`] is a 64-bit XXH64-based fingerprint of an exported symbol and
//! its flat slot list. Two descriptors built from the same registrations carry
//! the same hashes, so a generator can detect ABI drift between builds by
//! comparing hashes rather than whole signatures.
//!
//! # Examples
//!
//! ```
//! use flatbind_core::AbiHash;
//!
//! let int = AbiHash::from_name("i32");
//! let float = AbiHash::from_name("f32");
//!
//! let a = AbiHash::from_signature("oiio_ROI_contains", &[int], AbiHash::from_name("bool"));
//! let b = AbiHash::from_signature("oiio_ROI_contains", &[float], AbiHash::from_name("bool"));
//! assert_ne!(a, b);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants.
pub mod hash_constants {
    /// Separator constant used between slots
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type names
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for exported symbols
    pub const SYMBOL: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker mixed in with the return slot
    pub const RETURN: u64 = 0x7d3c8b4a92e15f6d;

    /// Slot position mixing constants; keeps slot order significant.
    pub const SLOT_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash of a flat type or signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct AbiHash(pub u64);

impl AbiHash {
    pub const EMPTY: AbiHash = AbiHash(0);

    /// Hash a flat type spelling (e.g. `"*const OIIO_ROI"`).
    #[inline]
    pub fn from_name(name: &str) -> Self {
        AbiHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash an exported symbol with its ordered slot types and return type.
    ///
    /// Slot order matters: `f(i32, f32)` and `f(f32, i32)` hash differently.
    #[inline]
    pub fn from_signature(symbol: &str, slots: &[AbiHash], returns: AbiHash) -> Self {
        let mut hash = hash_constants::SYMBOL ^ xxh64(symbol.as_bytes(), 0);
        for (i, slot) in slots.iter().enumerate() {
            let marker = hash_constants::SLOT_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::SLOT_MARKERS[0].wrapping_add(i as u64));
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ slot.0);
        }
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(hash_constants::RETURN ^ returns.0);
        AbiHash(hash)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for AbiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AbiHash({:#018x})", self.0)
    }
}

impl fmt::Display for AbiHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
