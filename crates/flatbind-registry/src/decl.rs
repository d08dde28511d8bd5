//! Registration declarations.
//!
//! A declaration is what an author asked for, with native overloads already
//! selected. Classification and adapter synthesis happen at finalize, once
//! every class and enum in the module is known.

use flatbind_core::{
    Decomposition, FunctionKind, NativeClass, NativeEnum, NativeField, NativeFunction, NativeLibrary,
    QualifiedName, RegistrationError, Representation, Selector, SmartPointerKind, TypePath,
};

use crate::overload::{export_name, select_overload, sibling_overloads};

/// A function, method, or constructor registration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub kind: FunctionKind,
    pub native: NativeFunction,
    /// Result transfers ownership to the caller
    pub factory: bool,
    pub decomposition: Option<Decomposition>,
    /// Extra entity omitting the trailing defaulted parameters
    pub simplified: Option<String>,
    /// Kept its native name although other overloads share it
    pub unnamed_overload: bool,
}

impl FunctionDecl {
    /// Select a free function overload from the library.
    pub fn resolve_free(
        library: &NativeLibrary,
        symbol: &str,
        selector: &Selector,
        name: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        let qualified = QualifiedName::from_qualified_string(symbol);
        let entity = name.unwrap_or(qualified.simple_name());
        let candidates = library.overloads(&qualified);
        let native = select_overload(entity, selector, candidates)?;
        let mut decl = Self::new(export_name(entity, native, name)?, FunctionKind::Free, native.clone());
        decl.unnamed_overload = name.is_none() && sibling_overloads(native, candidates) > 0;
        Ok(decl)
    }

    /// Select a method overload of `class`.
    pub fn resolve_method(
        class: &NativeClass,
        owner: &str,
        selector: &Selector,
        name: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        let entity = format!("{owner}_{}", name.unwrap_or(&selector.name));
        let native = select_overload(&entity, selector, &class.methods)?;
        let exported = export_name(&entity, native, name)?;
        let mut decl = Self::new(exported, FunctionKind::Method, native.clone());
        decl.unnamed_overload = name.is_none() && sibling_overloads(native, &class.methods) > 0;
        Ok(decl)
    }

    /// Select a constructor of `class`. Constructors default to `new`.
    pub fn resolve_constructor(
        class: &NativeClass,
        owner: &str,
        selector: &Selector,
        name: Option<&str>,
    ) -> Result<Self, RegistrationError> {
        let exported = name.unwrap_or("new");
        let entity = format!("{owner}_{exported}");
        let candidates = class.constructor_functions();
        // constructors are selected by parameters only
        let selector = Selector {
            name: class.simple_name().to_string(),
            ..selector.clone()
        };
        let native = select_overload(&entity, &selector, &candidates)?;
        let exported = export_name(&entity, native, Some(exported))?;
        Ok(Self::new(exported, FunctionKind::Constructor, native.clone()))
    }

    pub fn new(name: impl Into<String>, kind: FunctionKind, native: NativeFunction) -> Self {
        Self {
            name: name.into(),
            kind,
            native,
            factory: false,
            decomposition: None,
            simplified: None,
            unnamed_overload: false,
        }
    }

    pub fn as_factory(mut self) -> Self {
        self.factory = true;
        self
    }

    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = Some(decomposition);
        self
    }

    pub fn with_simplified(mut self, name: impl Into<String>) -> Self {
        self.simplified = Some(name.into());
        self
    }

    /// Exported names this declaration claims (the entity plus its simplified twin).
    pub fn claimed_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.simplified.as_deref())
    }
}

/// A field exposed on a class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub native: NativeField,
}

/// The class a smart pointer class manages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmartPointerDecl {
    pub kind: SmartPointerKind,
    pub target: TypePath,
}

/// A class registration with its members.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub native: TypePath,
    pub representation: Representation,
    pub smart_pointer: Option<SmartPointerDecl>,
    pub constructors: Vec<FunctionDecl>,
    pub methods: Vec<FunctionDecl>,
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, native: impl Into<TypePath>, representation: Representation) -> Self {
        Self {
            name: name.into(),
            native: native.into(),
            representation,
            smart_pointer: None,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// A smart pointer class managing `target`.
    pub fn smart_pointer(name: impl Into<String>, kind: SmartPointerKind, target: impl Into<TypePath>) -> Self {
        let target = target.into();
        let native = TypePath::instance(kind.native_name(), [flatbind_core::NativeType::Record(target.clone())]);
        Self {
            smart_pointer: Some(SmartPointerDecl { kind, target }),
            ..Self::new(name, native, Representation::SmartPointer)
        }
    }

    pub fn with_constructor(mut self, decl: FunctionDecl) -> Self {
        self.constructors.push(decl);
        self
    }

    pub fn with_method(mut self, decl: FunctionDecl) -> Self {
        self.methods.push(decl);
        self
    }

    pub fn with_field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    /// Member names synthesized for this class regardless of declarations.
    pub fn synthesized_members(&self) -> Vec<String> {
        let mut names = Vec::new();
        match self.representation {
            Representation::OpaqueReference => names.push("delete".to_string()),
            Representation::SmartPointer => {
                names.push("delete".to_string());
                names.push("get".to_string());
            }
            Representation::Value | Representation::Incomplete => {}
        }
        if self.representation == Representation::OpaqueReference {
            for field in &self.fields {
                names.push(format!("get_{}", field.name));
                if !field.native.is_const {
                    names.push(format!("set_{}", field.name));
                }
            }
        }
        names
    }

    /// Every module-wide key this class claims, with a description of the claimant.
    pub fn claims(&self) -> Vec<(String, String)> {
        let mut claims = vec![(self.name.clone(), self.native.to_string())];
        for decl in self.constructors.iter().chain(&self.methods) {
            for name in decl.claimed_names() {
                claims.push((format!("{}_{name}", self.name), format!("{}::{}", self.native, decl.native)));
            }
        }
        for member in self.synthesized_members() {
            claims.push((format!("{}_{member}", self.name), format!("{}::{member}", self.native)));
        }
        claims
    }
}

/// An enum registration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub native: NativeEnum,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, native: NativeEnum) -> Self {
        Self {
            name: name.into(),
            native,
        }
    }
}
