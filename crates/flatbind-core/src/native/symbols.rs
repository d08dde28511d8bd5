use std::fmt;

use crate::QualifiedName;
use crate::types::{ClassTraits, DefaultValue, EnumRepr, MethodQualifiers};

use super::{NativeType, TypePath};

/// A parameter of a native function.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeParam {
    pub name: String,
    pub ty: NativeType,
    pub default: Option<DefaultValue>,
}

impl NativeParam {
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// A native function, method, or function template instantiation.
///
/// Free functions carry their qualified name (`OIIO::getattribute`);
/// methods carry their simple name.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeFunction {
    pub name: String,
    pub params: Vec<NativeParam>,
    pub return_type: NativeType,
    pub qualifiers: MethodQualifiers,
    /// Concrete arguments of an instantiated function template
    pub template_args: Vec<NativeType>,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: NativeType::Void,
            qualifiers: MethodQualifiers::empty(),
            template_args: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: NativeType) -> Self {
        self.params.push(NativeParam::new(name, ty));
        self
    }

    pub fn with_default_param(mut self, name: impl Into<String>, ty: NativeType, default: DefaultValue) -> Self {
        self.params.push(NativeParam::new(name, ty).with_default(default));
        self
    }

    pub fn returning(mut self, ty: NativeType) -> Self {
        self.return_type = ty;
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: MethodQualifiers) -> Self {
        self.qualifiers |= qualifiers;
        self
    }

    /// Mark as a `const` member function.
    pub fn constant(self) -> Self {
        self.with_qualifiers(MethodQualifiers::CONST)
    }

    /// Mark as a static member function.
    pub fn static_member(self) -> Self {
        self.with_qualifiers(MethodQualifiers::STATIC)
    }

    pub fn instantiated(mut self, args: impl IntoIterator<Item = NativeType>) -> Self {
        self.template_args = args.into_iter().collect();
        self
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(MethodQualifiers::CONST)
    }

    pub fn is_static(&self) -> bool {
        self.qualifiers.contains(MethodQualifiers::STATIC)
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::from_qualified_string(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    pub fn param_types(&self) -> impl Iterator<Item = &NativeType> {
        self.params.iter().map(|p| &p.ty)
    }

    /// Number of trailing parameters that carry a native default.
    pub fn trailing_defaults(&self) -> usize {
        self.params.iter().rev().take_while(|p| p.default.is_some()).count()
    }

    /// Same name, parameters, constness, and template arguments.
    pub fn same_signature(&self, other: &NativeFunction) -> bool {
        self.name == other.name
            && self.is_const() == other.is_const()
            && self.template_args == other.template_args
            && self.param_types().eq(other.param_types())
    }

    /// Signature as written natively, e.g. `contains(const OIIO::ROI&) const`.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.template_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.template_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        write!(f, "(")?;
        for (i, ty) in self.param_types().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, ")")?;
        if self.is_const() {
            write!(f, " const")?;
        }
        Ok(())
    }
}

/// A data member of a native class.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    pub name: String,
    pub ty: NativeType,
    pub is_const: bool,
}

/// A native class or struct.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeClass {
    pub path: TypePath,
    pub traits: ClassTraits,
    pub fields: Vec<NativeField>,
    pub methods: Vec<NativeFunction>,
    /// Constructor parameter lists, in declaration order
    pub constructors: Vec<Vec<NativeParam>>,
}

impl NativeClass {
    pub fn new(path: impl Into<TypePath>) -> Self {
        Self {
            path: path.into(),
            traits: ClassTraits::empty(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// A class that is only forward-declared.
    pub fn declared_only(path: impl Into<TypePath>) -> Self {
        Self::new(path).with_traits(ClassTraits::DECLARED_ONLY)
    }

    pub fn with_traits(mut self, traits: ClassTraits) -> Self {
        self.traits |= traits;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: NativeType) -> Self {
        self.fields.push(NativeField {
            name: name.into(),
            ty,
            is_const: false,
        });
        self
    }

    pub fn with_const_field(mut self, name: impl Into<String>, ty: NativeType) -> Self {
        self.fields.push(NativeField {
            name: name.into(),
            ty,
            is_const: true,
        });
        self
    }

    pub fn with_method(mut self, method: NativeFunction) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, params: impl IntoIterator<Item = NativeParam>) -> Self {
        self.constructors.push(params.into_iter().collect());
        self
    }

    pub fn simple_name(&self) -> &str {
        self.path.name.simple_name()
    }

    pub fn field(&self, name: &str) -> Option<&NativeField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NativeFunction> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Constructors viewed as static functions returning the class by value,
    /// so they can go through the same overload selection as methods.
    pub fn constructor_functions(&self) -> Vec<NativeFunction> {
        self.constructors
            .iter()
            .map(|params| NativeFunction {
                name: self.simple_name().to_string(),
                params: params.clone(),
                return_type: NativeType::Record(self.path.clone()),
                qualifiers: MethodQualifiers::STATIC,
                template_args: Vec::new(),
            })
            .collect()
    }
}

/// A native enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEnum {
    pub name: QualifiedName,
    pub repr: EnumRepr,
    pub variants: Vec<(String, i64)>,
}

impl NativeEnum {
    pub fn new(name: impl Into<QualifiedName>, repr: EnumRepr) -> Self {
        Self {
            name: name.into(),
            repr,
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.variants.push((name.into(), value));
        self
    }

    /// Variants numbered `0..` in declaration order.
    pub fn with_variants<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        let start = self.variants.len() as i64;
        for (i, name) in names.into_iter().enumerate() {
            self.variants.push((name.into(), start + i as i64));
        }
        self
    }
}
