//! FunctionBuilder for registering free functions.
//!
//! Static member functions are free functions under their class's
//! qualified name (`OIIO::ImageInput::open`).

use flatbind_core::{Decomposition, NativeType, RegistrationError, Selector};
use flatbind_registry::FunctionDecl;

use crate::Module;

/// Builder for one free function registration.
///
/// # Example
///
/// ```ignore
/// module
///     .register_function("OIIO::getattribute")
///     .params([NativeType::StringView, NativeType::mut_ref(NativeType::int())])
///     .named("getattribute_int")
///     .build()?;
///
/// module.register_function("OIIO::ImageInput::open").factory().build()?;
/// ```
pub struct FunctionBuilder<'m, 'lib> {
    module: &'m mut Module<'lib>,
    symbol: String,
    selector: Selector,
    name: Option<String>,
    simplified: Option<String>,
    factory: bool,
    decomposition: Option<Decomposition>,
}

impl<'m, 'lib> FunctionBuilder<'m, 'lib> {
    pub(crate) fn new(module: &'m mut Module<'lib>, symbol: String) -> Self {
        let selector = Selector::named(symbol.as_str());
        Self {
            module,
            symbol,
            selector,
            name: None,
            simplified: None,
            factory: false,
            decomposition: None,
        }
    }

    /// Select the overload with exactly these parameter types.
    pub fn params(mut self, params: impl IntoIterator<Item = NativeType>) -> Self {
        self.selector = self.selector.with_params(params);
        self
    }

    /// Select a function template instantiation.
    pub fn template_args(mut self, args: impl IntoIterator<Item = NativeType>) -> Self {
        self.selector = self.selector.with_template_args(args);
        self
    }

    /// Explicit exported name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Also export a twin without the trailing defaulted parameters.
    pub fn simplified(mut self, name: &str) -> Self {
        self.simplified = Some(name.to_string());
        self
    }

    /// The result transfers ownership to the caller.
    pub fn factory(mut self) -> Self {
        self.factory = true;
        self
    }

    pub fn decompose(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = Some(decomposition);
        self
    }

    pub fn build(self) -> Result<(), RegistrationError> {
        let library = self.module.library();
        let decl = match FunctionDecl::resolve_free(library, &self.symbol, &self.selector, self.name.as_deref()) {
            Ok(decl) => decl,
            Err(error) => {
                self.module.record(error.clone());
                return Err(error);
            }
        };
        let mut decl = match self.decomposition {
            Some(decomposition) => decl.with_decomposition(decomposition),
            None => decl,
        };
        if let Some(simplified) = self.simplified {
            decl = decl.with_simplified(simplified);
        }
        if self.factory {
            decl = decl.as_factory();
        }
        self.module.registry_mut().register_function(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::{
        BindingConfig, DefaultValue, FactoryOwnership, NativeClass, NativeFunction, NativeLibrary, PrimitiveKind,
        RegistrationErrorKind, SmartPointerKind, TypeRef,
    };

    fn library() -> NativeLibrary {
        NativeLibrary::new()
            .with_class(NativeClass::new("OIIO::ImageBuf"))
            .with_function(
                NativeFunction::new("OIIO::getattribute")
                    .with_param("name", NativeType::StringView)
                    .with_param("val", NativeType::mut_ref(NativeType::int()))
                    .returning(NativeType::bool()),
            )
            .with_function(
                NativeFunction::new("OIIO::getattribute")
                    .with_param("name", NativeType::StringView)
                    .with_param("val", NativeType::mut_ref(NativeType::float()))
                    .returning(NativeType::bool()),
            )
            .with_function(
                NativeFunction::new("OIIO::attribute")
                    .with_param("name", NativeType::StringView)
                    .with_default_param("val", NativeType::int(), DefaultValue::Int(1))
                    .returning(NativeType::bool()),
            )
            .with_function(
                NativeFunction::new("OIIO::ImageBuf::create")
                    .with_param("name", NativeType::CString)
                    .returning(NativeType::mut_ptr(NativeType::record("OIIO::ImageBuf"))),
            )
            .with_function(
                NativeFunction::new("OIIO::convert_type")
                    .with_param("src", NativeType::float())
                    .returning(NativeType::primitive(PrimitiveKind::Uint8))
                    .instantiated([NativeType::primitive(PrimitiveKind::Uint8)]),
            )
    }

    #[test]
    fn single_overload_keeps_native_name() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module.register_function("OIIO::attribute").build().unwrap();
        let d = module.finalize().emit().unwrap();
        let f = d.function("attribute").unwrap();
        assert_eq!(f.symbol, "oiio_attribute");
        assert_eq!(f.params.len(), 2);
    }

    #[test]
    fn overloads_selected_by_params() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module
            .register_function("OIIO::getattribute")
            .params([NativeType::StringView, NativeType::mut_ref(NativeType::int())])
            .named("getattribute_int")
            .build()
            .unwrap();
        module
            .register_function("OIIO::getattribute")
            .params([NativeType::StringView, NativeType::mut_ref(NativeType::float())])
            .named("getattribute_float")
            .build()
            .unwrap();
        let d = module.finalize().emit().unwrap();
        assert_eq!(d.functions.len(), 2);
        let float = d.function("getattribute_float").unwrap();
        assert_eq!(
            float.param("val").unwrap().ty,
            TypeRef::raw(TypeRef::primitive(PrimitiveKind::Float), flatbind_core::Mutability::Mut)
        );
    }

    #[test]
    fn simplified_twin_drops_defaults() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module
            .register_function("OIIO::attribute")
            .simplified("attribute_default")
            .build()
            .unwrap();
        let d = module.finalize().emit().unwrap();
        assert_eq!(d.function("attribute_default").unwrap().params.len(), 1);
    }

    #[test]
    fn raw_factory_adopted_by_smart_pointer() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module.register_opaque_class("ImageBuf", "OIIO::ImageBuf").build().unwrap();
        module
            .register_smart_pointer("ImageBufPtr", SmartPointerKind::Unique, "OIIO::ImageBuf")
            .unwrap();
        module.register_function("OIIO::ImageBuf::create").factory().build().unwrap();
        let d = module.finalize().emit().unwrap();
        assert_eq!(d.function("create").unwrap().returns, TypeRef::handle("ImageBufPtr"));
    }

    #[test]
    fn raw_factory_without_smart_pointer_fails() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        module.register_opaque_class("ImageBuf", "OIIO::ImageBuf").build().unwrap();
        module.register_function("OIIO::ImageBuf::create").factory().build().unwrap();
        let finalized = module.finalize();
        let error = finalized.diagnostics().iter().next().unwrap();
        assert_eq!(error.kind(), RegistrationErrorKind::UnsupportedAdaptation);
        assert_eq!(error.entity(), "create");
    }

    #[test]
    fn raw_ownership_policy() {
        let lib = library();
        let config = BindingConfig::default().with_factory_ownership(FactoryOwnership::Raw);
        let mut module = Module::with_config("oiio", &lib, config);
        module.register_opaque_class("ImageBuf", "OIIO::ImageBuf").build().unwrap();
        module.register_function("OIIO::ImageBuf::create").factory().build().unwrap();
        let d = module.finalize().emit().unwrap();
        assert_eq!(
            d.function("create").unwrap().returns,
            TypeRef::opaque("ImageBuf", flatbind_core::Mutability::Mut)
        );
    }

    #[test]
    fn template_instance_needs_name() {
        let lib = library();
        let mut module = Module::new("oiio", &lib);
        let err = module
            .register_function("OIIO::convert_type")
            .template_args([NativeType::primitive(PrimitiveKind::Uint8)])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), RegistrationErrorKind::MissingExportedName);

        module
            .register_function("OIIO::convert_type")
            .template_args([NativeType::primitive(PrimitiveKind::Uint8)])
            .named("convert_type_u8")
            .build()
            .unwrap();
        let finalized = module.finalize();
        assert_eq!(finalized.diagnostics().len(), 1);
        assert!(finalized.partial().function("convert_type_u8").is_some());
    }
}
