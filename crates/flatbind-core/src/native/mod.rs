//! Model of the wrapped native surface.
//!
//! This is the input side: classes, enums, and free functions with fully
//! resolved signatures. Nothing here is exported directly; the registry
//! classifies and adapts it into flat entities.

mod library;
mod selector;
mod symbols;
mod ty;

pub use library::NativeLibrary;
pub use selector::Selector;
pub use symbols::{NativeClass, NativeEnum, NativeField, NativeFunction, NativeParam};
pub use ty::{NativeType, SmartPointerKind, TypePath};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualifiedName;
    use crate::types::{ClassTraits, DefaultValue, Mutability, PrimitiveKind};

    fn read_scanline_overloads() -> Vec<NativeFunction> {
        vec![
            NativeFunction::new("read_scanline")
                .with_param("y", NativeType::int())
                .with_param("z", NativeType::int())
                .with_param("format", NativeType::record("OIIO::TypeDesc"))
                .with_param("data", NativeType::mut_ptr(NativeType::Void))
                .with_default_param("xstride", NativeType::stride_t(), DefaultValue::Int(i64::MIN))
                .returning(NativeType::bool()),
            NativeFunction::new("read_scanline")
                .with_param("y", NativeType::int())
                .with_param("z", NativeType::int())
                .with_param("data", NativeType::mut_ptr(NativeType::float()))
                .returning(NativeType::bool()),
        ]
    }

    #[test]
    fn native_type_display() {
        assert_eq!(NativeType::const_ref(NativeType::record("OIIO::ROI")).to_string(), "const OIIO::ROI&");
        assert_eq!(NativeType::mut_ptr(NativeType::float()).to_string(), "float*");
        assert_eq!(NativeType::span(NativeType::float(), Mutability::Const).to_string(), "cspan<float>");
        assert_eq!(NativeType::unique_ptr("OIIO::ImageInput").to_string(), "std::unique_ptr<OIIO::ImageInput>");
        assert_eq!(
            NativeType::pair(NativeType::StringView, NativeType::int()).to_string(),
            "std::pair<string_view, int>"
        );
    }

    #[test]
    fn template_param_detection() {
        let generic = NativeType::record(TypePath::instance("Imath::Vec3", [NativeType::template_param("T")]));
        assert!(generic.contains_template_param());
        let concrete = NativeType::record(TypePath::instance("Imath::Vec3", [NativeType::float()]));
        assert!(!concrete.contains_template_param());
        assert!(NativeType::const_ptr(NativeType::template_param("T")).contains_template_param());
    }

    #[test]
    fn function_signature_display() {
        let f = NativeFunction::new("contains")
            .with_param("other", NativeType::const_ref(NativeType::record("OIIO::ROI")))
            .returning(NativeType::bool())
            .constant();
        assert_eq!(f.signature(), "contains(const OIIO::ROI&) const");
    }

    #[test]
    fn trailing_defaults_counted_from_end() {
        let overloads = read_scanline_overloads();
        assert_eq!(overloads[0].trailing_defaults(), 1);
        assert_eq!(overloads[1].trailing_defaults(), 0);
    }

    #[test]
    fn selector_by_params() {
        let overloads = read_scanline_overloads();
        let sel = Selector::named("read_scanline").with_params([
            NativeType::int(),
            NativeType::int(),
            NativeType::mut_ptr(NativeType::float()),
        ]);
        let matched: Vec<_> = overloads.iter().filter(|f| sel.matches(f)).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].params.len(), 3);

        let loose = Selector::named("read_scanline");
        assert_eq!(overloads.iter().filter(|f| loose.matches(f)).count(), 2);
    }

    #[test]
    fn selector_by_constness() {
        let getter = NativeFunction::new("data").returning(NativeType::mut_ptr(NativeType::Void));
        let const_getter = NativeFunction::new("data")
            .returning(NativeType::const_ptr(NativeType::Void))
            .constant();
        assert!(Selector::named("data").constant().matches(&const_getter));
        assert!(!Selector::named("data").constant().matches(&getter));
        assert!(Selector::named("data").mutable().matches(&getter));
    }

    #[test]
    fn selector_display() {
        let sel = Selector::named("get").with_template_args([NativeType::int()]).with_params(std::iter::empty());
        assert_eq!(sel.to_string(), "get<int>()");
        assert_eq!(Selector::named("open").to_string(), "open(..)");
    }

    #[test]
    fn library_lookup() {
        let library = NativeLibrary::new()
            .with_class(NativeClass::new("OIIO::ROI").with_traits(ClassTraits::plain_data()))
            .with_function(NativeFunction::new("OIIO::getattribute").with_param("name", NativeType::StringView))
            .with_function(
                NativeFunction::new("OIIO::getattribute")
                    .with_param("name", NativeType::StringView)
                    .with_param("val", NativeType::mut_ref(NativeType::int())),
            );
        assert!(library.class(&TypePath::new("OIIO::ROI")).is_some());
        assert_eq!(library.overloads(&QualifiedName::from("OIIO::getattribute")).len(), 2);
        assert!(library.overloads(&QualifiedName::from("OIIO::missing")).is_empty());
        assert_eq!(library.function_count(), 2);
    }

    #[test]
    fn constructor_functions_return_class() {
        let class = NativeClass::new("OIIO::ROI")
            .with_constructor(std::iter::empty())
            .with_constructor([NativeParam::new("xbegin", NativeType::int())]);
        let ctors = class.constructor_functions();
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[1].name, "ROI");
        assert_eq!(ctors[1].return_type, NativeType::record("OIIO::ROI"));
    }

    #[test]
    fn enum_variants_numbered() {
        let e = NativeEnum::new("OIIO::ImageSpec::SerialFormat", Default::default())
            .with_variants(["SerialText", "SerialXML"]);
        assert_eq!(e.variants, vec![("SerialText".to_string(), 0), ("SerialXML".to_string(), 1)]);
        assert_eq!(PrimitiveKind::Int32, e.repr.primitive());
    }
}
