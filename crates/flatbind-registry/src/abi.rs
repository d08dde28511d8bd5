//! C-level projection of flat entities.
//!
//! Each [`FunctionEntity`] becomes one C function: the receiver is the first
//! slot (`_this`), views expand to `name` + `name_len`, and out-slots are
//! pointers. Enums travel as their underlying integer type; value classes
//! are plain structs; everything else is a pointer to an incomplete struct.

use std::fmt::Write;

use flatbind_core::{AbiHash, FunctionEntity, Mutability, PrimitiveKind, Representation, TypeRef};

use crate::descriptor::ModuleDescriptor;

/// One C parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSlot {
    pub name: String,
    pub ty: String,
}

/// A function as a C declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CFunction {
    pub symbol: String,
    pub returns: String,
    pub slots: Vec<CSlot>,
    pub abi_hash: AbiHash,
}

impl CFunction {
    /// `ret symbol(slots);`
    pub fn declaration(&self) -> String {
        let params = if self.slots.is_empty() {
            "void".to_string()
        } else {
            self.slots
                .iter()
                .map(|s| format!("{} {}", s.ty, s.name))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{} {}({params});", self.returns, self.symbol)
    }
}

/// Project one function entity under `prefix`.
pub fn project(function: &FunctionEntity, prefix: &str) -> CFunction {
    let mut slots = Vec::new();
    if let Some(receiver) = &function.receiver {
        slots.push(CSlot {
            name: "_this".to_string(),
            ty: pointer_to(&struct_name(prefix, &receiver.class), receiver.mutability),
        });
    }
    for param in &function.params {
        expand(&mut slots, &param.name, &param.ty, prefix);
    }
    CFunction {
        symbol: function.symbol.clone(),
        returns: c_type(&function.returns, prefix),
        slots,
        abi_hash: function.abi_hash,
    }
}

/// Deterministic hash of a function's flat signature under its symbol.
pub fn signature_hash(function: &FunctionEntity) -> AbiHash {
    let mut slots = Vec::with_capacity(function.params.len() + 1);
    if let Some(receiver) = &function.receiver {
        slots.push(TypeRef::opaque(receiver.class.clone(), receiver.mutability).abi_hash());
    }
    slots.extend(function.params.iter().map(|p| p.ty.abi_hash()));
    AbiHash::from_signature(&function.symbol, &slots, function.returns.abi_hash())
}

/// Names of the C slots a flat parameter expands to.
pub fn slot_names(name: &str, ty: &TypeRef) -> Vec<String> {
    let pair = match ty {
        TypeRef::SpanView { .. } | TypeRef::StringView => true,
        TypeRef::RawPointer { pointee, .. } => pointee.is_view(),
        _ => false,
    };
    if pair {
        vec![name.to_string(), format!("{name}_len")]
    } else {
        vec![name.to_string()]
    }
}

fn expand(slots: &mut Vec<CSlot>, name: &str, ty: &TypeRef, prefix: &str) {
    match ty {
        TypeRef::SpanView { .. } | TypeRef::StringView => {
            slots.push(CSlot {
                name: name.to_string(),
                ty: c_type(ty, prefix),
            });
            slots.push(CSlot {
                name: format!("{name}_len"),
                ty: "size_t".to_string(),
            });
        }
        // out-slot for a view: pointer to each half
        TypeRef::RawPointer { pointee, mutability } if pointee.is_view() => {
            slots.push(CSlot {
                name: name.to_string(),
                ty: pointer_to(&c_type(pointee, prefix), *mutability),
            });
            slots.push(CSlot {
                name: format!("{name}_len"),
                ty: pointer_to("size_t", *mutability),
            });
        }
        other => slots.push(CSlot {
            name: name.to_string(),
            ty: c_type(other, prefix),
        }),
    }
}

/// C spelling of a flat type. Views are spelled as their data pointer.
pub fn c_type(ty: &TypeRef, prefix: &str) -> String {
    match ty {
        TypeRef::Void => "void".to_string(),
        TypeRef::Primitive { primitive } => c_primitive(*primitive).to_string(),
        TypeRef::Enum { repr, .. } => c_primitive(repr.primitive()).to_string(),
        TypeRef::Value { class } => struct_name(prefix, class),
        TypeRef::OpaquePointer { class, mutability } => pointer_to(&struct_name(prefix, class), *mutability),
        TypeRef::SmartPointerHandle { class } => pointer_to(&struct_name(prefix, class), Mutability::Mut),
        TypeRef::SpanView { element, mutability } => pointer_to(c_primitive(*element), *mutability),
        TypeRef::StringView => "const char*".to_string(),
        TypeRef::RawPointer { pointee, mutability } => pointer_to(&c_type(pointee, prefix), *mutability),
    }
}

fn c_primitive(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Bool => "bool",
        PrimitiveKind::Char => "char",
        PrimitiveKind::Int8 => "int8_t",
        PrimitiveKind::Int16 => "int16_t",
        PrimitiveKind::Int32 => "int32_t",
        PrimitiveKind::Int64 => "int64_t",
        PrimitiveKind::Uint8 => "uint8_t",
        PrimitiveKind::Uint16 => "uint16_t",
        PrimitiveKind::Uint32 => "uint32_t",
        PrimitiveKind::Uint64 => "uint64_t",
        PrimitiveKind::Float => "float",
        PrimitiveKind::Double => "double",
        PrimitiveKind::Usize => "size_t",
        PrimitiveKind::Isize => "ptrdiff_t",
    }
}

fn struct_name(prefix: &str, class: &str) -> String {
    format!("{prefix}_{class}")
}

fn pointer_to(ty: &str, mutability: Mutability) -> String {
    match mutability {
        Mutability::Const => format!("const {ty}*"),
        Mutability::Mut => format!("{ty}*"),
    }
}

/// Render a whole descriptor as C declarations: type definitions first,
/// then enum constants, then every function in descriptor order.
pub fn render(descriptor: &ModuleDescriptor) -> String {
    let prefix = descriptor.symbol_prefix.as_str();
    let mut out = String::new();
    let _ = writeln!(out, "/* {} */", descriptor.module);
    for class in &descriptor.classes {
        let name = struct_name(prefix, &class.name);
        match class.representation {
            Representation::Value => {
                let _ = writeln!(out, "typedef struct {name} {{");
                for field in &class.fields {
                    let _ = writeln!(out, "    {} {};", c_type(&field.ty, prefix), field.name);
                }
                let _ = writeln!(out, "}} {name};");
            }
            _ => {
                let _ = writeln!(out, "typedef struct {name} {name};");
            }
        }
    }
    for e in &descriptor.enums {
        let name = struct_name(prefix, &e.name);
        let _ = writeln!(out, "typedef {} {name};", c_primitive(e.repr.primitive()));
        for variant in &e.variants {
            let _ = writeln!(out, "#define {name}_{} (({name}){})", variant.name, variant.value);
        }
    }
    for function in descriptor.all_functions() {
        let _ = writeln!(out, "{}", project(function, prefix).declaration());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::{EnumRepr, FunctionKind, Ownership, Param, Receiver};

    fn contains() -> FunctionEntity {
        let mut f = FunctionEntity::new("contains", FunctionKind::Method, "OIIO::ROI::contains(const OIIO::ROI&) const")
            .with_owner("ROI")
            .with_receiver(Receiver::new("ROI", Mutability::Const))
            .with_param(Param::input("other", TypeRef::raw(TypeRef::value("ROI"), Mutability::Const)))
            .with_return(TypeRef::primitive(PrimitiveKind::Bool), Ownership::Copied);
        f.symbol = "oiio_ROI_contains".into();
        f
    }

    #[test]
    fn receiver_is_first_slot() {
        let c = project(&contains(), "oiio");
        assert_eq!(c.slots[0].name, "_this");
        assert_eq!(c.slots[0].ty, "const oiio_ROI*");
        assert_eq!(c.declaration(), "bool oiio_ROI_contains(const oiio_ROI* _this, const oiio_ROI* other);");
    }

    #[test]
    fn slot_names_follow_expansion() {
        assert_eq!(slot_names("data", &TypeRef::StringView), vec!["data", "data_len"]);
        assert_eq!(
            slot_names("result", &TypeRef::out_slot(TypeRef::span(PrimitiveKind::Float, Mutability::Const))),
            vec!["result", "result_len"]
        );
        assert_eq!(slot_names("n", &TypeRef::primitive(PrimitiveKind::Int32)), vec!["n"]);
    }

    #[test]
    fn views_expand_to_pointer_and_length() {
        let mut f = FunctionEntity::new("attribute", FunctionKind::Free, "OIIO::attribute(string_view, cspan<float>)")
            .with_param(Param::input("name", TypeRef::StringView))
            .with_param(Param::input("values", TypeRef::span(PrimitiveKind::Float, Mutability::Const)))
            .with_param(Param::output("result", TypeRef::out_slot(TypeRef::StringView)));
        f.symbol = "oiio_attribute".into();
        let c = project(&f, "oiio");
        let spelled: Vec<_> = c.slots.iter().map(|s| format!("{} {}", s.ty, s.name)).collect();
        assert_eq!(
            spelled,
            vec![
                "const char* name",
                "size_t name_len",
                "const float* values",
                "size_t values_len",
                "const char** result",
                "size_t* result_len",
            ]
        );
    }

    #[test]
    fn enums_travel_as_integers() {
        let ty = TypeRef::Enum {
            name: "OpenMode".into(),
            repr: EnumRepr::U8,
        };
        assert_eq!(c_type(&ty, "oiio"), "uint8_t");
        assert_eq!(c_type(&TypeRef::handle("ImageInputPtr"), "oiio"), "oiio_ImageInputPtr*");
    }

    #[test]
    fn hash_tracks_receiver_mutability() {
        let a = contains();
        let mut b = contains();
        b.receiver = Some(Receiver::new("ROI", Mutability::Mut));
        assert_eq!(signature_hash(&a), signature_hash(&contains()));
        assert_ne!(signature_hash(&a), signature_hash(&b));
    }

    #[test]
    fn empty_parameter_list_is_void() {
        let mut f = FunctionEntity::new("geterror", FunctionKind::Free, "OIIO::geterror()");
        f.symbol = "oiio_geterror".into();
        assert_eq!(project(&f, "oiio").declaration(), "void oiio_geterror(void);");
    }
}
