use std::fmt;

use serde::{Deserialize, Serialize};

use crate::QualifiedName;
use crate::types::{Mutability, PrimitiveKind};

/// Ownership model of a native smart pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartPointerKind {
    /// `std::unique_ptr`
    Unique,
    /// `std::shared_ptr`
    Shared,
}

impl SmartPointerKind {
    pub const fn native_name(self) -> &'static str {
        match self {
            SmartPointerKind::Unique => "std::unique_ptr",
            SmartPointerKind::Shared => "std::shared_ptr",
        }
    }
}

/// A native class path with its concrete template arguments.
///
/// `OIIO::ROI` has no arguments; `Imath::Vec3<float>` has one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePath {
    pub name: QualifiedName,
    pub args: Vec<NativeType>,
}

impl TypePath {
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A concrete template instantiation.
    pub fn instance(name: impl Into<QualifiedName>, args: impl IntoIterator<Item = NativeType>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn is_instance(&self) -> bool {
        !self.args.is_empty()
    }

    /// True when any argument is still an unbound template parameter.
    pub fn has_template_params(&self) -> bool {
        self.args.iter().any(NativeType::contains_template_param)
    }
}

impl From<&str> for TypePath {
    fn from(s: &str) -> Self {
        TypePath::new(s)
    }
}

impl From<QualifiedName> for TypePath {
    fn from(name: QualifiedName) -> Self {
        TypePath::new(name)
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// A type as it appears in a native signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    Void,
    Primitive(PrimitiveKind),
    /// Class or struct by value
    Record(TypePath),
    Enum(QualifiedName),
    Pointer {
        pointee: Box<NativeType>,
        mutability: Mutability,
    },
    Reference {
        referent: Box<NativeType>,
        mutability: Mutability,
    },
    /// Non-owning byte view (`string_view`)
    StringView,
    /// Null-terminated `const char*`
    CString,
    /// Owning string (`std::string`)
    String,
    /// Non-owning contiguous range (`span<T>` / `cspan<T>`)
    Span {
        element: Box<NativeType>,
        mutability: Mutability,
    },
    SmartPointer {
        kind: SmartPointerKind,
        target: TypePath,
    },
    Pair(Box<NativeType>, Box<NativeType>),
    /// Unbound template parameter
    TemplateParam(String),
}

impl NativeType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        NativeType::Primitive(kind)
    }

    pub fn bool() -> Self {
        NativeType::Primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        NativeType::Primitive(PrimitiveKind::Int32)
    }

    pub fn float() -> Self {
        NativeType::Primitive(PrimitiveKind::Float)
    }

    pub fn size_t() -> Self {
        NativeType::Primitive(PrimitiveKind::Usize)
    }

    pub fn stride_t() -> Self {
        NativeType::Primitive(PrimitiveKind::Isize)
    }

    pub fn record(path: impl Into<TypePath>) -> Self {
        NativeType::Record(path.into())
    }

    pub fn enumeration(name: impl Into<QualifiedName>) -> Self {
        NativeType::Enum(name.into())
    }

    pub fn const_ptr(pointee: NativeType) -> Self {
        NativeType::Pointer {
            pointee: Box::new(pointee),
            mutability: Mutability::Const,
        }
    }

    pub fn mut_ptr(pointee: NativeType) -> Self {
        NativeType::Pointer {
            pointee: Box::new(pointee),
            mutability: Mutability::Mut,
        }
    }

    pub fn const_ref(referent: NativeType) -> Self {
        NativeType::Reference {
            referent: Box::new(referent),
            mutability: Mutability::Const,
        }
    }

    pub fn mut_ref(referent: NativeType) -> Self {
        NativeType::Reference {
            referent: Box::new(referent),
            mutability: Mutability::Mut,
        }
    }

    pub fn span(element: NativeType, mutability: Mutability) -> Self {
        NativeType::Span {
            element: Box::new(element),
            mutability,
        }
    }

    pub fn unique_ptr(target: impl Into<TypePath>) -> Self {
        NativeType::SmartPointer {
            kind: SmartPointerKind::Unique,
            target: target.into(),
        }
    }

    pub fn shared_ptr(target: impl Into<TypePath>) -> Self {
        NativeType::SmartPointer {
            kind: SmartPointerKind::Shared,
            target: target.into(),
        }
    }

    pub fn pair(first: NativeType, second: NativeType) -> Self {
        NativeType::Pair(Box::new(first), Box::new(second))
    }

    pub fn template_param(name: impl Into<String>) -> Self {
        NativeType::TemplateParam(name.into())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, NativeType::Void)
    }

    /// Whether an unbound template parameter appears anywhere inside.
    pub fn contains_template_param(&self) -> bool {
        match self {
            NativeType::TemplateParam(_) => true,
            NativeType::Record(path) | NativeType::SmartPointer { target: path, .. } => path.has_template_params(),
            NativeType::Pointer { pointee: inner, .. }
            | NativeType::Reference { referent: inner, .. }
            | NativeType::Span { element: inner, .. } => inner.contains_template_param(),
            NativeType::Pair(a, b) => a.contains_template_param() || b.contains_template_param(),
            _ => false,
        }
    }

    /// Strip one level of reference.
    pub fn without_reference(&self) -> &NativeType {
        match self {
            NativeType::Reference { referent, .. } => referent,
            other => other,
        }
    }
}

impl From<PrimitiveKind> for NativeType {
    fn from(kind: PrimitiveKind) -> Self {
        NativeType::Primitive(kind)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Void => write!(f, "void"),
            NativeType::Primitive(kind) => write!(f, "{}", kind.native_name()),
            NativeType::Record(path) => write!(f, "{path}"),
            NativeType::Enum(name) => write!(f, "{name}"),
            NativeType::Pointer { pointee, mutability } => match mutability {
                Mutability::Const => write!(f, "const {pointee}*"),
                Mutability::Mut => write!(f, "{pointee}*"),
            },
            NativeType::Reference { referent, mutability } => match mutability {
                Mutability::Const => write!(f, "const {referent}&"),
                Mutability::Mut => write!(f, "{referent}&"),
            },
            NativeType::StringView => write!(f, "string_view"),
            NativeType::CString => write!(f, "const char*"),
            NativeType::String => write!(f, "std::string"),
            NativeType::Span { element, mutability } => match mutability {
                Mutability::Const => write!(f, "cspan<{element}>"),
                Mutability::Mut => write!(f, "span<{element}>"),
            },
            NativeType::SmartPointer { kind, target } => write!(f, "{}<{target}>", kind.native_name()),
            NativeType::Pair(a, b) => write!(f, "std::pair<{a}, {b}>"),
            NativeType::TemplateParam(name) => write!(f, "{name}"),
        }
    }
}
