//! Type Classifier.
//!
//! Decides how each native type crosses the boundary, given the classes,
//! smart pointers, and enums registered in the module:
//!
//! | Native type | Classification |
//! |---|---|
//! | primitive, registered enum | [`Classification::Flat`] |
//! | record registered as `Value` | [`Classification::Flat`] (`TypeRef::Value`) |
//! | record registered as opaque or incomplete | [`Classification::Opaque`] |
//! | pointer to primitive, value, opaque class | [`Classification::Flat`] |
//! | span, string view, C string, owning string | [`Classification::View`] |
//! | smart pointer with a registered handle class | [`Classification::SmartPointer`] |
//! | pair | [`Classification::Aggregate`] |
//! | reference | [`Classification::Reference`] around the referent |
//!
//! Template parameters, pointers to pointers, and spans of non-primitives
//! have no representation and are reported as unclassifiable.

use rustc_hash::FxHashMap;

use flatbind_core::{
    EnumRepr, Mutability, NativeLibrary, NativeType, QualifiedName, Representation, SmartPointerKind,
    TypePath, TypeRef,
};

use crate::decl::{ClassDecl, EnumDecl};

/// Where a view's bytes come from natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSource {
    /// `span<T>` / `cspan<T>`
    Span,
    /// `string_view`
    StringView,
    /// Null-terminated `const char*`
    CString,
    /// Owning `std::string`
    OwnedString,
}

/// Result of classifying one native type.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Crosses unchanged.
    Flat(TypeRef),
    /// Becomes `(pointer, length)`.
    View { view: TypeRef, source: ViewSource },
    /// Object kept behind pointer identity when passed or returned by value.
    Opaque { class: String, representation: Representation },
    /// Smart pointer by value; travels as a handle.
    SmartPointer { handle: String, kind: SmartPointerKind },
    /// Native reference to a classified referent.
    Reference { referent: Box<Classification>, mutability: Mutability },
    /// Multi-member value that must be decomposed.
    Aggregate { members: Vec<(String, NativeType)> },
}

/// Why a type could not be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// No representation rule applies.
    Unclassifiable { reason: String },
    /// The type names a class or enum not registered in the module.
    Unresolved { reference: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassInfo {
    name: String,
    representation: Representation,
}

/// Registered names the classifier resolves against.
#[derive(Debug, Default, Clone)]
pub struct ClassTable {
    classes: FxHashMap<TypePath, ClassInfo>,
    smart_pointers: FxHashMap<(SmartPointerKind, TypePath), String>,
    enums: FxHashMap<QualifiedName, (String, EnumRepr)>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declarations. Finalize never passes two declarations
    /// wrapping the same native type; if it happens anyway the smaller name
    /// wins so the table does not depend on order.
    pub fn from_decls<'a>(
        classes: impl IntoIterator<Item = &'a ClassDecl>,
        enums: impl IntoIterator<Item = &'a EnumDecl>,
    ) -> Self {
        let mut table = Self::new();
        for class in classes {
            match &class.smart_pointer {
                Some(sp) => table.insert_smart_pointer(sp.kind, sp.target.clone(), &class.name),
                None => table.insert_class(class.native.clone(), &class.name, class.representation),
            }
        }
        for e in enums {
            table.insert_enum(e.native.name.clone(), &e.name, e.native.repr);
        }
        table
    }

    pub fn insert_class(&mut self, path: TypePath, name: &str, representation: Representation) {
        let info = ClassInfo {
            name: name.to_string(),
            representation,
        };
        self.classes
            .entry(path)
            .and_modify(|existing| {
                if info.name < existing.name {
                    *existing = info.clone();
                }
            })
            .or_insert(info);
    }

    pub fn insert_smart_pointer(&mut self, kind: SmartPointerKind, target: TypePath, name: &str) {
        self.smart_pointers
            .entry((kind, target))
            .and_modify(|existing| {
                if name < existing.as_str() {
                    *existing = name.to_string();
                }
            })
            .or_insert_with(|| name.to_string());
    }

    pub fn insert_enum(&mut self, native: QualifiedName, name: &str, repr: EnumRepr) {
        self.enums
            .entry(native)
            .and_modify(|existing| {
                if name < existing.0.as_str() {
                    *existing = (name.to_string(), repr);
                }
            })
            .or_insert_with(|| (name.to_string(), repr));
    }

    /// Exported name and representation of a registered class.
    pub fn class(&self, path: &TypePath) -> Option<(&str, Representation)> {
        self.classes
            .get(path)
            .map(|info| (info.name.as_str(), info.representation))
    }

    /// Handle class for `target`, preferring unique ownership over shared.
    pub fn handle_for(&self, target: &TypePath) -> Option<(&str, SmartPointerKind)> {
        [SmartPointerKind::Unique, SmartPointerKind::Shared]
            .into_iter()
            .find_map(|kind| {
                self.smart_pointers
                    .get(&(kind, target.clone()))
                    .map(|name| (name.as_str(), kind))
            })
    }

    /// Classify a native type.
    pub fn classify(&self, ty: &NativeType) -> Result<Classification, ClassifyError> {
        let classification = match ty {
            NativeType::Void => Classification::Flat(TypeRef::Void),
            NativeType::Primitive(kind) => Classification::Flat(TypeRef::primitive(*kind)),
            NativeType::Enum(name) => Classification::Flat(self.enum_ref(name)?),
            NativeType::Record(path) => self.classify_record(path)?,
            NativeType::Pointer { pointee, mutability } => {
                Classification::Flat(self.classify_pointer(pointee, *mutability)?)
            }
            NativeType::Reference { referent, mutability } => {
                if matches!(**referent, NativeType::Reference { .. }) {
                    return Err(unclassifiable("reference to reference"));
                }
                Classification::Reference {
                    referent: Box::new(self.classify(referent)?),
                    mutability: *mutability,
                }
            }
            NativeType::StringView => Classification::View {
                view: TypeRef::StringView,
                source: ViewSource::StringView,
            },
            NativeType::CString => Classification::View {
                view: TypeRef::StringView,
                source: ViewSource::CString,
            },
            NativeType::String => Classification::View {
                view: TypeRef::StringView,
                source: ViewSource::OwnedString,
            },
            NativeType::Span { element, mutability } => match **element {
                NativeType::Primitive(kind) => Classification::View {
                    view: TypeRef::span(kind, *mutability),
                    source: ViewSource::Span,
                },
                ref other => return Err(unclassifiable(format!("span element '{other}' is not a primitive"))),
            },
            NativeType::SmartPointer { kind, target } => match self.smart_pointers.get(&(*kind, target.clone())) {
                Some(handle) => Classification::SmartPointer {
                    handle: handle.clone(),
                    kind: *kind,
                },
                None => return Err(unresolved(ty)),
            },
            NativeType::Pair(first, second) => Classification::Aggregate {
                members: vec![("first".to_string(), (**first).clone()), ("second".to_string(), (**second).clone())],
            },
            NativeType::TemplateParam(name) => {
                return Err(unclassifiable(format!("unbound template parameter '{name}'")));
            }
        };
        tracing::trace!(native = %ty, ?classification, "classified");
        Ok(classification)
    }

    /// Classify a type that must already be flat (fields, out-slots).
    pub fn classify_flat(&self, ty: &NativeType) -> Result<TypeRef, ClassifyError> {
        match self.classify(ty)? {
            Classification::Flat(type_ref) => Ok(type_ref),
            other => Err(unclassifiable(format!("'{ty}' is not flat ({})", describe(&other)))),
        }
    }

    /// Members of a pair or of an unregistered library record, for
    /// decomposing returns.
    pub fn aggregate_members(&self, ty: &NativeType, library: &NativeLibrary) -> Option<Vec<(String, NativeType)>> {
        match ty {
            NativeType::Pair(first, second) => Some(vec![
                ("first".to_string(), (**first).clone()),
                ("second".to_string(), (**second).clone()),
            ]),
            NativeType::Record(path) if self.class(path).is_none() => library
                .class(path)
                .filter(|c| !c.fields.is_empty())
                .map(|c| c.fields.iter().map(|f| (f.name.clone(), f.ty.clone())).collect()),
            _ => None,
        }
    }

    fn enum_ref(&self, name: &QualifiedName) -> Result<TypeRef, ClassifyError> {
        match self.enums.get(name) {
            Some((exported, repr)) => Ok(TypeRef::Enum {
                name: exported.clone(),
                repr: *repr,
            }),
            None => Err(ClassifyError::Unresolved {
                reference: name.to_string(),
            }),
        }
    }

    fn classify_record(&self, path: &TypePath) -> Result<Classification, ClassifyError> {
        if path.has_template_params() {
            return Err(unclassifiable(format!("'{path}' has unbound template parameters")));
        }
        match self.class(path) {
            Some((name, Representation::Value)) => Ok(Classification::Flat(TypeRef::value(name))),
            Some((name, representation)) => Ok(Classification::Opaque {
                class: name.to_string(),
                representation,
            }),
            None => Err(ClassifyError::Unresolved {
                reference: path.to_string(),
            }),
        }
    }

    fn classify_pointer(&self, pointee: &NativeType, mutability: Mutability) -> Result<TypeRef, ClassifyError> {
        let pointee_ref = match pointee {
            NativeType::Void => TypeRef::Void,
            NativeType::Primitive(kind) => TypeRef::primitive(*kind),
            NativeType::Enum(name) => self.enum_ref(name)?,
            NativeType::Record(path) => match self.classify_record(path)? {
                Classification::Flat(value) => value,
                Classification::Opaque { class, .. } => return Ok(TypeRef::opaque(class, mutability)),
                other => return Err(unclassifiable(format!("pointer to {}", describe(&other)))),
            },
            NativeType::Pointer { .. } | NativeType::CString => return Err(unclassifiable("pointer to pointer")),
            other => return Err(unclassifiable(format!("pointer to '{other}'"))),
        };
        Ok(TypeRef::raw(pointee_ref, mutability))
    }
}

fn unclassifiable(reason: impl Into<String>) -> ClassifyError {
    ClassifyError::Unclassifiable { reason: reason.into() }
}

fn unresolved(ty: &NativeType) -> ClassifyError {
    ClassifyError::Unresolved {
        reference: ty.to_string(),
    }
}

fn describe(classification: &Classification) -> &'static str {
    match classification {
        Classification::Flat(_) => "flat",
        Classification::View { .. } => "a view",
        Classification::Opaque { .. } => "an opaque object",
        Classification::SmartPointer { .. } => "a smart pointer",
        Classification::Reference { .. } => "a reference",
        Classification::Aggregate { .. } => "an aggregate",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::PrimitiveKind;

    fn table() -> ClassTable {
        let mut table = ClassTable::new();
        table.insert_class(TypePath::new("OIIO::ROI"), "ROI", Representation::Value);
        table.insert_class(TypePath::new("OIIO::ImageSpec"), "ImageSpec", Representation::OpaqueReference);
        table.insert_class(TypePath::new("OIIO::Filesystem::IOProxy"), "IOProxy", Representation::Incomplete);
        table.insert_smart_pointer(SmartPointerKind::Unique, TypePath::new("OIIO::ImageInput"), "ImageInputPtr");
        table.insert_enum(QualifiedName::from("OIIO::ImageInput::OpenMode"), "OpenMode", EnumRepr::I32);
        table
    }

    #[test]
    fn primitives_are_flat() {
        assert_eq!(
            table().classify(&NativeType::int()).unwrap(),
            Classification::Flat(TypeRef::primitive(PrimitiveKind::Int32))
        );
    }

    #[test]
    fn value_and_opaque_records() {
        let t = table();
        assert_eq!(
            t.classify(&NativeType::record("OIIO::ROI")).unwrap(),
            Classification::Flat(TypeRef::value("ROI"))
        );
        assert_eq!(
            t.classify(&NativeType::record("OIIO::ImageSpec")).unwrap(),
            Classification::Opaque {
                class: "ImageSpec".into(),
                representation: Representation::OpaqueReference
            }
        );
    }

    #[test]
    fn pointers() {
        let t = table();
        assert_eq!(
            t.classify_flat(&NativeType::mut_ptr(NativeType::float())).unwrap(),
            TypeRef::raw(TypeRef::primitive(PrimitiveKind::Float), Mutability::Mut)
        );
        assert_eq!(
            t.classify_flat(&NativeType::mut_ptr(NativeType::record("OIIO::Filesystem::IOProxy")))
                .unwrap(),
            TypeRef::opaque("IOProxy", Mutability::Mut)
        );
        assert_eq!(
            t.classify_flat(&NativeType::const_ptr(NativeType::Void)).unwrap(),
            TypeRef::raw(TypeRef::Void, Mutability::Const)
        );
    }

    #[test]
    fn pointer_to_pointer_is_unclassifiable() {
        let err = table()
            .classify(&NativeType::mut_ptr(NativeType::mut_ptr(NativeType::int())))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Unclassifiable { .. }));
    }

    #[test]
    fn template_param_is_unclassifiable() {
        let err = table().classify(&NativeType::template_param("T")).unwrap_err();
        assert!(matches!(err, ClassifyError::Unclassifiable { .. }));
        let generic = NativeType::record(TypePath::instance("Imath::Vec3", [NativeType::template_param("T")]));
        assert!(matches!(table().classify(&generic), Err(ClassifyError::Unclassifiable { .. })));
    }

    #[test]
    fn views() {
        let t = table();
        assert_eq!(
            t.classify(&NativeType::span(NativeType::float(), Mutability::Const)).unwrap(),
            Classification::View {
                view: TypeRef::span(PrimitiveKind::Float, Mutability::Const),
                source: ViewSource::Span
            }
        );
        assert!(matches!(
            t.classify(&NativeType::CString).unwrap(),
            Classification::View {
                source: ViewSource::CString,
                ..
            }
        ));
        assert!(t.classify(&NativeType::span(NativeType::record("OIIO::ROI"), Mutability::Const)).is_err());
    }

    #[test]
    fn smart_pointers_need_handle_class() {
        let t = table();
        assert_eq!(
            t.classify(&NativeType::unique_ptr("OIIO::ImageInput")).unwrap(),
            Classification::SmartPointer {
                handle: "ImageInputPtr".into(),
                kind: SmartPointerKind::Unique
            }
        );
        assert!(matches!(
            t.classify(&NativeType::shared_ptr("OIIO::ImageInput")),
            Err(ClassifyError::Unresolved { .. })
        ));
        assert_eq!(
            t.handle_for(&TypePath::new("OIIO::ImageInput")),
            Some(("ImageInputPtr", SmartPointerKind::Unique))
        );
    }

    #[test]
    fn unregistered_names_are_unresolved() {
        let t = table();
        assert_eq!(
            t.classify(&NativeType::record("OIIO::ImageBuf")).unwrap_err(),
            ClassifyError::Unresolved {
                reference: "OIIO::ImageBuf".into()
            }
        );
        assert!(matches!(
            t.classify(&NativeType::enumeration("OIIO::Missing")),
            Err(ClassifyError::Unresolved { .. })
        ));
    }

    #[test]
    fn references_wrap_referent() {
        let t = table();
        match t.classify(&NativeType::const_ref(NativeType::record("OIIO::ROI"))).unwrap() {
            Classification::Reference { referent, mutability } => {
                assert_eq!(*referent, Classification::Flat(TypeRef::value("ROI")));
                assert_eq!(mutability, Mutability::Const);
            }
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn table_prefers_smaller_name() {
        let mut t = ClassTable::new();
        t.insert_class(TypePath::new("OIIO::ROI"), "Roi", Representation::Value);
        t.insert_class(TypePath::new("OIIO::ROI"), "ROI", Representation::Value);
        assert_eq!(t.class(&TypePath::new("OIIO::ROI")).unwrap().0, "ROI");
    }

    #[test]
    fn pair_is_aggregate() {
        let pair = NativeType::pair(NativeType::StringView, NativeType::int());
        match table().classify(&pair).unwrap() {
            Classification::Aggregate { members } => {
                assert_eq!(members[0].0, "first");
                assert_eq!(members[1].1, NativeType::int());
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
    }
}
