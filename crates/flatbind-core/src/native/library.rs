use rustc_hash::FxHashMap;

use crate::QualifiedName;

use super::{NativeClass, NativeEnum, NativeFunction, TypePath};

/// Symbol table of the wrapped native library.
///
/// Overload sets and template instantiations are already expanded to
/// concrete types; the registry only selects among them.
///
/// # Example
///
/// ```ignore
/// let library = NativeLibrary::new()
///     .with_class(NativeClass::new("OIIO::ROI").with_traits(ClassTraits::plain_data()))
///     .with_function(NativeFunction::new("OIIO::geterror").returning(NativeType::String));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NativeLibrary {
    classes: FxHashMap<TypePath, NativeClass>,
    enums: FxHashMap<QualifiedName, NativeEnum>,
    functions: FxHashMap<QualifiedName, Vec<NativeFunction>>,
}

impl NativeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: NativeClass) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_enum(mut self, native_enum: NativeEnum) -> Self {
        self.add_enum(native_enum);
        self
    }

    /// Add a free function overload, keyed by its qualified name.
    pub fn with_function(mut self, function: NativeFunction) -> Self {
        self.add_function(function);
        self
    }

    pub fn add_class(&mut self, class: NativeClass) {
        self.classes.insert(class.path.clone(), class);
    }

    pub fn add_enum(&mut self, native_enum: NativeEnum) {
        self.enums.insert(native_enum.name.clone(), native_enum);
    }

    pub fn add_function(&mut self, function: NativeFunction) {
        self.functions
            .entry(function.qualified_name())
            .or_default()
            .push(function);
    }

    pub fn class(&self, path: &TypePath) -> Option<&NativeClass> {
        self.classes.get(path)
    }

    pub fn enumeration(&self, name: &QualifiedName) -> Option<&NativeEnum> {
        self.enums.get(name)
    }

    /// All overloads of a free function. Empty when unknown.
    pub fn overloads(&self, name: &QualifiedName) -> &[NativeFunction] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }
}
