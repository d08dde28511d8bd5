//! A native symbol table shaped like an image I/O library.

#![allow(dead_code)]

use flatbind::prelude::*;

pub fn int() -> NativeType {
    NativeType::int()
}

pub fn roi_class() -> NativeClass {
    let bounds = ["xbegin", "xend", "ybegin", "yend", "zbegin", "zend", "chbegin", "chend"];
    let mut roi = NativeClass::new("OIIO::ROI")
        .with_traits(ClassTraits::plain_data())
        .with_constructor(std::iter::empty())
        .with_constructor(bounds.iter().map(|b| NativeParam::new(*b, int())));
    for bound in bounds {
        roi = roi.with_field(bound, int());
    }
    roi.with_method(NativeFunction::new("width").returning(int()).constant())
        .with_method(NativeFunction::new("height").returning(int()).constant())
        .with_method(NativeFunction::new("defined").returning(NativeType::bool()).constant())
        .with_method(
            NativeFunction::new("contains")
                .with_param("other", NativeType::const_ref(NativeType::record("OIIO::ROI")))
                .returning(NativeType::bool())
                .constant(),
        )
        .with_method(
            NativeFunction::new("contains")
                .with_param("x", int())
                .with_param("y", int())
                .with_default_param("z", int(), DefaultValue::Int(0))
                .with_default_param("ch", int(), DefaultValue::Int(0))
                .returning(NativeType::bool())
                .constant(),
        )
}

pub fn type_desc_class() -> NativeClass {
    NativeClass::new("OIIO::TypeDesc")
        .with_traits(ClassTraits::plain_data())
        .with_field("basetype", NativeType::primitive(PrimitiveKind::Uint8))
        .with_field("aggregate", NativeType::primitive(PrimitiveKind::Uint8))
        .with_field("vecsemantics", NativeType::primitive(PrimitiveKind::Uint8))
        .with_field("reserved", NativeType::primitive(PrimitiveKind::Uint8))
        .with_field("arraylen", int())
        .with_method(NativeFunction::new("size").returning(NativeType::size_t()).constant())
        .with_method(NativeFunction::new("c_str").returning(NativeType::CString).constant())
}

pub fn image_spec_class() -> NativeClass {
    NativeClass::new("OIIO::ImageSpec")
        .with_traits(ClassTraits::NON_TRIVIAL_DESTRUCTOR)
        .with_field("width", int())
        .with_field("height", int())
        .with_field("nchannels", int())
        .with_field("format", NativeType::record("OIIO::TypeDesc"))
        .with_field("channelnames", NativeType::Record(TypePath::instance("std::vector", [NativeType::String])))
        .with_constructor(std::iter::empty())
        .with_constructor([
            NativeParam::new("xres", int()),
            NativeParam::new("yres", int()),
            NativeParam::new("nchans", int()),
            NativeParam::new("fmt", NativeType::record("OIIO::TypeDesc")),
        ])
        .with_method(
            NativeFunction::new("channel_name")
                .with_param("chan", int())
                .returning(NativeType::StringView)
                .constant(),
        )
        .with_method(NativeFunction::new("roi").returning(NativeType::record("OIIO::ROI")).constant())
        .with_method(
            NativeFunction::new("serialize")
                .with_param("format", NativeType::enumeration("OIIO::ImageSpec::SerialFormat"))
                .with_default_param(
                    "verbose",
                    NativeType::enumeration("OIIO::ImageSpec::SerialVerbose"),
                    DefaultValue::Enum("OIIO::ImageSpec::SerialDetailed".into()),
                )
                .returning(NativeType::String)
                .constant(),
        )
        .with_method(
            NativeFunction::new("decode_compression_metadata")
                .with_default_param("defaultcomp", NativeType::StringView, DefaultValue::String(String::new()))
                .with_default_param("defaultqual", int(), DefaultValue::Int(-1))
                .returning(NativeType::pair(NativeType::String, int()))
                .constant(),
        )
        .with_method(
            NativeFunction::new("channelformat")
                .with_param("chan", int())
                .returning(NativeType::record("OIIO::TypeDesc"))
                .constant(),
        )
        .with_method(
            NativeFunction::new("attribute")
                .with_param("name", NativeType::StringView)
                .with_param("value", NativeType::float()),
        )
        .with_method(
            NativeFunction::new("attribute")
                .with_param("name", NativeType::StringView)
                .with_param("value", int()),
        )
        .with_method(
            NativeFunction::new("attribute")
                .with_param("name", NativeType::StringView)
                .with_param("value", NativeType::StringView),
        )
}

pub fn image_input_class() -> NativeClass {
    let float_ptr = NativeType::mut_ptr(NativeType::float());
    NativeClass::new("OIIO::ImageInput")
        .with_traits(ClassTraits::POLYMORPHIC | ClassTraits::NON_TRIVIAL_DESTRUCTOR)
        .with_method(
            NativeFunction::new("spec")
                .returning(NativeType::const_ref(NativeType::record("OIIO::ImageSpec")))
                .constant(),
        )
        .with_method(
            NativeFunction::new("spec_dimensions")
                .with_param("subimage", int())
                .with_default_param("miplevel", int(), DefaultValue::Int(0))
                .returning(NativeType::record("OIIO::ImageSpec")),
        )
        .with_method(NativeFunction::new("format_name").returning(NativeType::CString).constant())
        .with_method(NativeFunction::new("close").returning(NativeType::bool()))
        .with_method(
            NativeFunction::new("geterror")
                .with_default_param("clear", NativeType::bool(), DefaultValue::Bool(true))
                .returning(NativeType::String)
                .constant(),
        )
        .with_method(
            NativeFunction::new("read_scanline")
                .with_param("y", int())
                .with_param("z", int())
                .with_param("format", NativeType::record("OIIO::TypeDesc"))
                .with_param("data", NativeType::mut_ptr(NativeType::Void))
                .with_default_param("xstride", NativeType::stride_t(), DefaultValue::Int(i64::MIN))
                .returning(NativeType::bool()),
        )
        .with_method(
            NativeFunction::new("read_scanline")
                .with_param("y", int())
                .with_param("z", int())
                .with_param("data", float_ptr)
                .returning(NativeType::bool()),
        )
        .with_method(
            NativeFunction::new("read_image")
                .with_param("data", NativeType::span(NativeType::float(), Mutability::Mut))
                .returning(NativeType::bool()),
        )
        .with_method(
            NativeFunction::new("set_ioproxy")
                .with_param("ioproxy", NativeType::mut_ptr(NativeType::record("OIIO::Filesystem::IOProxy")))
                .returning(NativeType::bool()),
        )
        .with_method(NativeFunction::new("threads").returning(int()).constant())
        .with_method(NativeFunction::new("threads").with_param("n", int()))
        .with_method(NativeFunction::new("lock").constant())
        .with_method(NativeFunction::new("unlock").constant())
}

pub fn library() -> NativeLibrary {
    let image_input = TypePath::new("OIIO::ImageInput");
    NativeLibrary::new()
        .with_class(roi_class())
        .with_class(type_desc_class())
        .with_class(image_spec_class())
        .with_class(image_input_class())
        .with_class(NativeClass::declared_only("OIIO::Filesystem::IOProxy"))
        .with_enum(
            NativeEnum::new("OIIO::ImageSpec::SerialFormat", EnumRepr::I32).with_variants(["SerialText", "SerialXML"]),
        )
        .with_enum(
            NativeEnum::new("OIIO::ImageSpec::SerialVerbose", EnumRepr::I32).with_variants([
                "SerialBrief",
                "SerialDetailed",
                "SerialDetailedHuman",
            ]),
        )
        .with_enum(
            NativeEnum::new("OIIO::ImageInput::OpenMode", EnumRepr::I32).with_variants(["Closed", "Read", "Write"]),
        )
        .with_function(
            NativeFunction::new("OIIO::ImageInput::open")
                .with_param("filename", NativeType::const_ref(NativeType::String))
                .with_default_param(
                    "config",
                    NativeType::const_ptr(NativeType::record("OIIO::ImageSpec")),
                    DefaultValue::NullPointer,
                )
                .with_default_param(
                    "ioproxy",
                    NativeType::mut_ptr(NativeType::record("OIIO::Filesystem::IOProxy")),
                    DefaultValue::NullPointer,
                )
                .returning(NativeType::unique_ptr(image_input.clone())),
        )
        .with_function(
            NativeFunction::new("OIIO::ImageInput::create")
                .with_param("filename", NativeType::StringView)
                .returning(NativeType::mut_ptr(NativeType::Record(image_input))),
        )
        .with_function(NativeFunction::new("OIIO::openimageio_version").returning(int()))
        .with_function(
            NativeFunction::new("OIIO::geterror")
                .with_default_param("clear", NativeType::bool(), DefaultValue::Bool(true))
                .returning(NativeType::String),
        )
        .with_function(
            NativeFunction::new("OIIO::getattribute")
                .with_param("name", NativeType::StringView)
                .with_param("val", NativeType::mut_ref(int()))
                .returning(NativeType::bool()),
        )
        .with_function(
            NativeFunction::new("OIIO::getattribute")
                .with_param("name", NativeType::StringView)
                .with_param("val", NativeType::mut_ref(NativeType::float()))
                .returning(NativeType::bool()),
        )
        .with_function(
            NativeFunction::new("OIIO::getattribute")
                .with_param("name", NativeType::StringView)
                .with_param("val", NativeType::mut_ref(NativeType::String))
                .returning(NativeType::bool()),
        )
        .with_function(
            NativeFunction::new("OIIO::convert_pixel_values")
                .with_param("src", NativeType::span(NativeType::float(), Mutability::Const))
                .with_param("dst", NativeType::span(NativeType::primitive(PrimitiveKind::Uint8), Mutability::Mut))
                .returning(NativeType::bool())
                .instantiated([NativeType::float(), NativeType::primitive(PrimitiveKind::Uint8)]),
        )
        .with_function(
            NativeFunction::new("OIIO::convert_pixel_values")
                .with_param("src", NativeType::span(NativeType::float(), Mutability::Const))
                .with_param("dst", NativeType::span(NativeType::primitive(PrimitiveKind::Uint16), Mutability::Mut))
                .returning(NativeType::bool())
                .instantiated([NativeType::float(), NativeType::primitive(PrimitiveKind::Uint16)]),
        )
        .with_function(
            NativeFunction::new("OIIO::Strutil::to_upper")
                .with_param("s", NativeType::CString)
                .returning(NativeType::String),
        )
}

/// Register the whole image I/O surface. Every call is expected to succeed.
pub fn register_surface(module: &mut Module<'_>) {
    let int4 = || [int(), int(), int(), int()];
    let type_desc = || NativeType::record("OIIO::TypeDesc");

    module
        .register_value_class("TypeDesc", "OIIO::TypeDesc")
        .method("size")
        .method("c_str")
        .build()
        .unwrap();
    module
        .register_value_class("ROI", "OIIO::ROI")
        .constructor(std::iter::empty())
        .constructor_as([int4(), int4()].concat(), "new_bounds")
        .method("width")
        .method("height")
        .method("defined")
        .method_as(
            Selector::named("contains").with_params([NativeType::const_ref(NativeType::record("OIIO::ROI"))]),
            "contains_roi",
        )
        .method_with(Selector::named("contains").with_params(int4()), Some("contains_point"), |m| {
            m.with_simplified("contains_xy")
        })
        .build()
        .unwrap();

    module
        .register_enum("SerialFormat", "OIIO::ImageSpec::SerialFormat")
        .build()
        .unwrap();
    module
        .register_enum("SerialVerbose", "OIIO::ImageSpec::SerialVerbose")
        .build()
        .unwrap();
    module.register_enum("OpenMode", "OIIO::ImageInput::OpenMode").build().unwrap();

    module
        .register_opaque_class("ImageSpec", "OIIO::ImageSpec")
        .constructor(std::iter::empty())
        .constructor_as([int(), int(), int(), type_desc()], "new_format")
        .field("width")
        .field("height")
        .field("nchannels")
        .field("format")
        .method("channel_name")
        .method("roi")
        .method("serialize")
        .method_with("decode_compression_metadata", None, |m| {
            m.with_decomposition(Decomposition::new().to_buffer("first", "compression").to_return("second"))
        })
        .method("channelformat")
        .method_as(
            Selector::named("attribute").with_params([NativeType::StringView, NativeType::float()]),
            "attribute_float",
        )
        .method_as(Selector::named("attribute").with_params([NativeType::StringView, int()]), "attribute_int")
        .method_as(
            Selector::named("attribute").with_params([NativeType::StringView, NativeType::StringView]),
            "attribute_string",
        )
        .build()
        .unwrap();

    module
        .register_incomplete_class("IOProxy", "OIIO::Filesystem::IOProxy")
        .build()
        .unwrap();
    module
        .register_opaque_class("ImageInput", "OIIO::ImageInput")
        .method("spec")
        .method("spec_dimensions")
        .method("format_name")
        .method("close")
        .method("geterror")
        .method_as(
            Selector::named("read_scanline").with_params([
                int(),
                int(),
                type_desc(),
                NativeType::mut_ptr(NativeType::Void),
                NativeType::stride_t(),
            ]),
            "read_scanline_00",
        )
        .method_as(
            Selector::named("read_scanline").with_params([int(), int(), NativeType::mut_ptr(NativeType::float())]),
            "read_scanline_01",
        )
        .method("read_image")
        .method("set_ioproxy")
        .method_as(Selector::named("threads").constant(), "threads")
        .method_as(Selector::named("threads").mutable(), "set_threads")
        .method("lock")
        .method("unlock")
        .build()
        .unwrap();
    module
        .register_smart_pointer("ImageInputPtr", SmartPointerKind::Unique, "OIIO::ImageInput")
        .unwrap();

    module
        .register_function("OIIO::ImageInput::open")
        .simplified("open_file")
        .build()
        .unwrap();
    module.register_function("OIIO::ImageInput::create").factory().build().unwrap();
    module.register_function("OIIO::openimageio_version").build().unwrap();
    module.register_function("OIIO::geterror").build().unwrap();
    for (value, name) in [(int(), "getattribute_int"), (NativeType::float(), "getattribute_float")] {
        module
            .register_function("OIIO::getattribute")
            .params([NativeType::StringView, NativeType::mut_ref(value)])
            .named(name)
            .build()
            .unwrap();
    }
    for (element, name) in [
        (PrimitiveKind::Uint8, "convert_pixel_values_u8"),
        (PrimitiveKind::Uint16, "convert_pixel_values_u16"),
    ] {
        module
            .register_function("OIIO::convert_pixel_values")
            .template_args([NativeType::float(), NativeType::primitive(element)])
            .named(name)
            .build()
            .unwrap();
    }
    module.register_function("OIIO::Strutil::to_upper").build().unwrap();
}
