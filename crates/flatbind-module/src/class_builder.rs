//! ClassBuilder for registering native classes.
//!
//! Members are selected from the native class in the library. A member that
//! fails to resolve is recorded in the module's diagnostics immediately and
//! left out; the class itself still registers on [`ClassBuilder::build`].
//!
//! # Example
//!
//! ```ignore
//! module
//!     .register_opaque_class("ImageInput", "OIIO::ImageInput")
//!     .method("spec")
//!     .method_as(
//!         Selector::named("read_scanline").with_params([NativeType::int(), NativeType::int(), float_ptr]),
//!         "read_scanline_01",
//!     )
//!     .field("threads")
//!     .build()?;
//! ```

use flatbind_core::{NativeClass, NativeType, RegistrationError, Representation, Selector, TypePath};
use flatbind_registry::{ClassDecl, FieldDecl, FunctionDecl};

use crate::Module;

/// Builder for one class registration.
///
/// Created by the `Module::register_*class` family.
pub struct ClassBuilder<'m, 'lib> {
    module: &'m mut Module<'lib>,
    decl: ClassDecl,
    native: Option<&'lib NativeClass>,
    /// First member failure, returned from `build`
    failed: Option<RegistrationError>,
}

impl<'m, 'lib> ClassBuilder<'m, 'lib> {
    pub(crate) fn new(module: &'m mut Module<'lib>, name: String, native: TypePath, representation: Representation) -> Self {
        let library = module.library();
        let class = library.class(&native);
        Self {
            module,
            decl: ClassDecl::new(name, native, representation),
            native: class,
            failed: None,
        }
    }

    /// Add the constructor with exactly these parameter types, exported as `new`.
    pub fn constructor(self, params: impl IntoIterator<Item = NativeType>) -> Self {
        self.add_constructor(params, None)
    }

    /// Add a constructor under an explicit name (needed once there are two).
    pub fn constructor_as(self, params: impl IntoIterator<Item = NativeType>, name: &str) -> Self {
        self.add_constructor(params, Some(name))
    }

    /// Add a method, keeping its native name.
    pub fn method(self, selector: impl Into<Selector>) -> Self {
        self.method_with(selector, None, |decl| decl)
    }

    /// Add a method under an explicit exported name.
    pub fn method_as(self, selector: impl Into<Selector>, name: &str) -> Self {
        self.method_with(selector, Some(name), |decl| decl)
    }

    /// Add a method and adjust its declaration, e.g. to attach a
    /// decomposition or request a simplified twin.
    ///
    /// ```ignore
    /// builder.method_with("decode", None, |m| {
    ///     m.with_decomposition(Decomposition::new().to_buffer("first", "text").to_return("second"))
    /// })
    /// ```
    pub fn method_with(
        mut self,
        selector: impl Into<Selector>,
        name: Option<&str>,
        adjust: impl FnOnce(FunctionDecl) -> FunctionDecl,
    ) -> Self {
        let selector = selector.into();
        let member = name.unwrap_or(&selector.name).to_string();
        let Some(native) = self.member_target(&member) else {
            return self;
        };
        match FunctionDecl::resolve_method(native, &self.decl.name, &selector, name) {
            Ok(decl) => self.decl.methods.push(adjust(decl)),
            Err(error) => self.fail(error),
        }
        self
    }

    /// Expose a native field under its own name.
    pub fn field(self, native_name: &str) -> Self {
        self.field_as(native_name, native_name)
    }

    pub fn field_as(mut self, native_name: &str, name: &str) -> Self {
        let Some(native) = self.member_target(name) else {
            return self;
        };
        match native.field(native_name) {
            Some(field) => self.decl.fields.push(FieldDecl {
                name: name.to_string(),
                native: field.clone(),
            }),
            None => {
                let error = RegistrationError::UnresolvedReference {
                    entity: format!("{}_{name}", self.decl.name),
                    reference: format!("{}::{native_name}", self.decl.native),
                };
                self.fail(error);
            }
        }
        self
    }

    /// Register the class with the members that resolved.
    ///
    /// # Errors
    ///
    /// The first member failure, or the class's own registration failure.
    pub fn build(self) -> Result<(), RegistrationError> {
        let registered = self.module.registry_mut().register_class(self.decl);
        match self.failed {
            Some(error) => Err(error),
            None => registered,
        }
    }

    fn add_constructor(mut self, params: impl IntoIterator<Item = NativeType>, name: Option<&str>) -> Self {
        let member = name.unwrap_or("new").to_string();
        let Some(native) = self.member_target(&member) else {
            return self;
        };
        let selector = Selector::named(native.simple_name()).with_params(params);
        match FunctionDecl::resolve_constructor(native, &self.decl.name, &selector, name) {
            Ok(decl) => self.decl.constructors.push(decl),
            Err(error) => self.fail(error),
        }
        self
    }

    /// The native class members are looked up in, or `None` after recording
    /// why this class cannot take the member.
    fn member_target(&mut self, member: &str) -> Option<&'lib NativeClass> {
        if !self.decl.representation.accepts_members() {
            let reason = match self.decl.representation {
                Representation::Incomplete => "an incomplete class accepts no members",
                _ => "a smart pointer class exposes only lifetime and dereference",
            };
            self.fail(RegistrationError::InvalidMember {
                entity: self.decl.name.clone(),
                member: member.to_string(),
                reason: reason.to_string(),
            });
            return None;
        }
        // a missing native class is reported once, when the class registers
        self.native
    }

    fn fail(&mut self, error: RegistrationError) {
        tracing::debug!(class = %self.decl.name, %error, "member rejected");
        self.module.record(error.clone());
        self.failed.get_or_insert(error);
    }
}
