//! Primitive-level building blocks shared by the native model and the flat
//! model:
//! - [`PrimitiveKind`]: numeric and boolean kinds, with size and alignment
//! - [`Mutability`]: constness of pointers, views, and receivers
//! - [`EnumRepr`]: explicit underlying integer of an enum
//! - [`MethodQualifiers`] / [`ClassTraits`]: native declaration flags
//! - [`DefaultValue`]: native default arguments
//! - [`ScalarValue`]: typed primitive values with a byte encoding

mod default_value;
mod int_width;
mod mutability;
mod primitive_kind;
mod qualifiers;
mod scalar;

pub use default_value::DefaultValue;
pub use int_width::{EnumRepr, IntWidth};
pub use mutability::Mutability;
pub use primitive_kind::{POINTER_SIZE, PrimitiveKind};
pub use qualifiers::{ClassTraits, MethodQualifiers};
pub use scalar::ScalarValue;

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn primitive_kind_names() {
        assert_eq!(PrimitiveKind::Bool.name(), "bool");
        assert_eq!(PrimitiveKind::Int32.name(), "i32");
        assert_eq!(PrimitiveKind::Uint64.name(), "u64");
        assert_eq!(PrimitiveKind::Float.name(), "f32");
        assert_eq!(PrimitiveKind::Usize.native_name(), "size_t");
        assert_eq!(PrimitiveKind::Isize.native_name(), "ptrdiff_t");
    }

    #[test]
    fn primitive_sizes() {
        assert_eq!(PrimitiveKind::Bool.size(), 1);
        assert_eq!(PrimitiveKind::Int16.size(), 2);
        assert_eq!(PrimitiveKind::Float.size(), 4);
        assert_eq!(PrimitiveKind::Double.size(), 8);
        assert_eq!(PrimitiveKind::Usize.size(), POINTER_SIZE);
        assert_eq!(PrimitiveKind::Int64.align(), 8);
    }

    #[test]
    fn primitive_classification() {
        assert!(PrimitiveKind::Uint8.is_integer());
        assert!(!PrimitiveKind::Uint8.is_signed());
        assert!(PrimitiveKind::Double.is_float());
        assert!(!PrimitiveKind::Bool.is_integer());
    }

    #[test]
    fn enum_repr_from_bits() {
        let repr = EnumRepr::from_bits(16, false).unwrap();
        assert_eq!(repr.width, IntWidth::Bits16);
        assert_eq!(repr.primitive(), PrimitiveKind::Uint16);
        assert!(EnumRepr::from_bits(12, true).is_err());
    }

    #[test]
    fn enum_repr_contains() {
        let u8_repr = EnumRepr::U8;
        assert!(u8_repr.contains(0));
        assert!(u8_repr.contains(255));
        assert!(!u8_repr.contains(256));
        assert!(!u8_repr.contains(-1));

        let i32_repr = EnumRepr::I32;
        assert!(i32_repr.contains(i32::MIN as i64));
        assert!(i32_repr.contains(i32::MAX as i64));
        assert!(!i32_repr.contains(i32::MAX as i64 + 1));

        let i64_repr = EnumRepr::new(IntWidth::Bits64, true);
        assert!(i64_repr.contains(i64::MIN));
    }

    #[test]
    fn int_width_serializes_as_number() {
        let json = serde_json::to_string(&EnumRepr::U32).unwrap();
        assert_eq!(json, r#"{"width":32,"signed":false}"#);
        let back: EnumRepr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EnumRepr::U32);
        assert!(serde_json::from_str::<IntWidth>("12").is_err());
    }

    #[test]
    fn class_traits_flat_candidate() {
        assert!(ClassTraits::plain_data().is_flat_candidate());
        assert!(!(ClassTraits::plain_data() | ClassTraits::POLYMORPHIC).is_flat_candidate());
        assert!(!ClassTraits::NON_TRIVIAL_DESTRUCTOR.is_flat_candidate());
        assert!(!ClassTraits::empty().is_flat_candidate());
    }

    #[test]
    fn mutability_from_const() {
        assert_eq!(Mutability::from_const(true), Mutability::Const);
        assert!(!Mutability::from_const(false).is_const());
    }

    #[test]
    fn scalar_bytes_round_trip() {
        let values = [
            ScalarValue::Bool(true),
            ScalarValue::Int16(-1234),
            ScalarValue::Uint32(0xdead_beef),
            ScalarValue::Double(OrderedFloat(2.5)),
            ScalarValue::Isize(-7),
            ScalarValue::Usize(42),
        ];
        for value in values {
            let bytes = value.to_le_bytes();
            assert_eq!(bytes.len(), value.kind().size());
            assert_eq!(ScalarValue::from_le_bytes(value.kind(), &bytes), Some(value));
        }
    }

    #[test]
    fn scalar_short_input() {
        assert_eq!(ScalarValue::from_le_bytes(PrimitiveKind::Int32, &[1, 2]), None);
        assert_eq!(ScalarValue::from_le_bytes(PrimitiveKind::Bool, &[]), None);
    }

    #[test]
    fn default_value_display() {
        assert_eq!(DefaultValue::Int(-1).to_string(), "-1");
        assert_eq!(DefaultValue::String("".into()).to_string(), "\"\"");
        assert_eq!(DefaultValue::NullPointer.to_string(), "nullptr");
        assert_eq!(DefaultValue::Enum("OIIO::ImageSpec::SerialText".into()).to_string(), "OIIO::ImageSpec::SerialText");
    }
}
