//! The registration entry point.

use flatbind_core::{
    BindingConfig, Diagnostics, NativeLibrary, QualifiedName, RegistrationError, Representation, SmartPointerKind,
    TypePath,
};
use flatbind_registry::{ClassDecl, EntityRegistry, FinalizedModule};

use crate::{ClassBuilder, EnumBuilder, FunctionBuilder};

/// A binding module under registration.
///
/// # Example
///
/// ```ignore
/// let mut module = Module::new("oiio", &library);
/// module
///     .register_class("ROI", "OIIO::ROI", Representation::Value)
///     .method("contains")
///     .build()?;
/// module.register_smart_pointer("ImageInputPtr", SmartPointerKind::Unique, "OIIO::ImageInput")?;
/// module.register_function("OIIO::ImageInput::open").factory().build()?;
/// let descriptor = module.finalize().emit()?;
/// ```
pub struct Module<'lib> {
    registry: EntityRegistry<'lib>,
}

impl<'lib> Module<'lib> {
    pub fn new(name: impl Into<String>, library: &'lib NativeLibrary) -> Self {
        Self::with_config(name, library, BindingConfig::default())
    }

    pub fn with_config(name: impl Into<String>, library: &'lib NativeLibrary, config: BindingConfig) -> Self {
        Self {
            registry: EntityRegistry::new(name, library, config),
        }
    }

    pub fn name(&self) -> &str {
        self.registry.module_name()
    }

    pub fn library(&self) -> &'lib NativeLibrary {
        self.registry.library()
    }

    pub fn config(&self) -> &BindingConfig {
        self.registry.config()
    }

    pub fn registry(&self) -> &EntityRegistry<'lib> {
        &self.registry
    }

    /// Failures recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.registry.diagnostics()
    }

    /// Start registering a class. Members are added on the builder.
    pub fn register_class(
        &mut self,
        name: &str,
        native: impl Into<TypePath>,
        representation: Representation,
    ) -> ClassBuilder<'_, 'lib> {
        ClassBuilder::new(self, name.to_string(), native.into(), representation)
    }

    pub fn register_value_class(&mut self, name: &str, native: impl Into<TypePath>) -> ClassBuilder<'_, 'lib> {
        self.register_class(name, native, Representation::Value)
    }

    pub fn register_opaque_class(&mut self, name: &str, native: impl Into<TypePath>) -> ClassBuilder<'_, 'lib> {
        self.register_class(name, native, Representation::OpaqueReference)
    }

    /// Register a pass-through handle type. It accepts no members.
    pub fn register_incomplete_class(&mut self, name: &str, native: impl Into<TypePath>) -> ClassBuilder<'_, 'lib> {
        self.register_class(name, native, Representation::Incomplete)
    }

    /// Register the handle class for `kind<target>`.
    pub fn register_smart_pointer(
        &mut self,
        name: &str,
        kind: SmartPointerKind,
        target: impl Into<TypePath>,
    ) -> Result<(), RegistrationError> {
        self.registry.register_class(ClassDecl::smart_pointer(name, kind, target))
    }

    pub fn register_enum(&mut self, name: &str, native: impl Into<QualifiedName>) -> EnumBuilder<'_, 'lib> {
        EnumBuilder::new(self, name.to_string(), native.into())
    }

    /// Start registering a free function by its qualified native name.
    pub fn register_function(&mut self, symbol: &str) -> FunctionBuilder<'_, 'lib> {
        FunctionBuilder::new(self, symbol.to_string())
    }

    /// Close the module. Nothing can be registered afterwards.
    pub fn finalize(self) -> FinalizedModule {
        self.registry.finalize()
    }

    pub(crate) fn registry_mut(&mut self) -> &mut EntityRegistry<'lib> {
        &mut self.registry
    }

    pub(crate) fn record(&mut self, error: RegistrationError) {
        self.registry.record(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::{ClassTraits, NativeClass, NativeFunction, NativeType, RegistrationErrorKind};

    fn library() -> NativeLibrary {
        NativeLibrary::new()
            .with_class(NativeClass::new("OIIO::ImageInput").with_traits(ClassTraits::POLYMORPHIC))
            .with_function(
                NativeFunction::new("OIIO::ImageInput::open")
                    .with_param("filename", NativeType::String)
                    .returning(NativeType::unique_ptr("OIIO::ImageInput")),
            )
    }

    #[test]
    fn module_name_is_default_prefix() {
        let lib = library();
        let module = Module::new("oiio", &lib);
        assert_eq!(module.name(), "oiio");
        assert_eq!(module.config().prefix_for(module.name()), "oiio");
        assert!(module.diagnostics().is_empty());
    }

    #[test]
    fn smart_pointer_and_factory() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module.register_opaque_class("ImageInput", "OIIO::ImageInput").build().unwrap();
        module
            .register_smart_pointer("ImageInputPtr", SmartPointerKind::Unique, "OIIO::ImageInput")
            .unwrap();
        module.register_function("OIIO::ImageInput::open").factory().build().unwrap();

        let descriptor = module.finalize().emit().unwrap();
        assert_eq!(descriptor.smart_pointers.len(), 1);
        assert!(descriptor.function("open").is_some());
    }

    #[test]
    fn duplicate_smart_pointer_name() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module.register_opaque_class("ImageInput", "OIIO::ImageInput").build().unwrap();
        let err = module
            .register_smart_pointer("ImageInput", SmartPointerKind::Unique, "OIIO::ImageInput")
            .unwrap_err();
        assert_eq!(err.kind(), RegistrationErrorKind::DuplicateExportedName);
    }
}
