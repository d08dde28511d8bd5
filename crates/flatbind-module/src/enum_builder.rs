//! EnumBuilder for registering native enums.
//!
//! An enum mirrors its native counterpart one-to-one. When the library's
//! symbol table carries the enum, `build()` alone is enough. Enums the table
//! lacks (nested or macro-generated ones) are declared with [`value`] and
//! [`auto_value`]; when the table does carry the enum, declared values must
//! match it exactly.
//!
//! ```ignore
//! module.register_enum("OpenMode", "OIIO::ImageInput::OpenMode").build()?;
//!
//! module
//!     .register_enum("SerialFormat", "OIIO::ImageSpec::SerialFormat")
//!     .repr(EnumRepr::I32)
//!     .auto_value("SerialText")
//!     .auto_value("SerialXML")
//!     .build()?;
//! ```
//!
//! [`value`]: EnumBuilder::value
//! [`auto_value`]: EnumBuilder::auto_value

use flatbind_core::{EnumRepr, NativeEnum, QualifiedName, RegistrationError};
use flatbind_registry::EnumDecl;

use crate::Module;

pub struct EnumBuilder<'m, 'lib> {
    module: &'m mut Module<'lib>,
    name: String,
    native: QualifiedName,
    repr: Option<EnumRepr>,
    values: Vec<(String, i64)>,
    next_value: i64,
}

impl<'m, 'lib> EnumBuilder<'m, 'lib> {
    pub(crate) fn new(module: &'m mut Module<'lib>, name: String, native: QualifiedName) -> Self {
        Self {
            module,
            name,
            native,
            repr: None,
            values: Vec::new(),
            next_value: 0,
        }
    }

    /// Underlying representation for an enum the library does not describe.
    pub fn repr(mut self, repr: EnumRepr) -> Self {
        self.repr = Some(repr);
        self
    }

    /// Declare a value explicitly. The next auto value becomes `value + 1`.
    pub fn value(mut self, name: &str, value: i64) -> Self {
        self.values.push((name.to_string(), value));
        self.next_value = value.saturating_add(1);
        self
    }

    pub fn auto_value(self, name: &str) -> Self {
        let value = self.next_value;
        self.value(name, value)
    }

    /// Register the enum.
    ///
    /// # Errors
    ///
    /// `UnresolvedReference` when neither the library nor the builder
    /// describes the enum, `InvalidMember` when declared values disagree with
    /// the library, and anything the registry rejects.
    pub fn build(self) -> Result<(), RegistrationError> {
        let library = self.module.library();
        let native = match (library.enumeration(&self.native), self.values.is_empty()) {
            (Some(native), true) => Ok(native.clone()),
            (Some(native), false) => {
                let declared = NativeEnum {
                    name: self.native.clone(),
                    repr: self.repr.unwrap_or(native.repr),
                    variants: self.values,
                };
                mirror(&self.name, native, declared)
            }
            (None, false) => Ok(NativeEnum {
                name: self.native.clone(),
                repr: self.repr.unwrap_or(EnumRepr::I32),
                variants: self.values,
            }),
            (None, true) => Err(RegistrationError::UnresolvedReference {
                entity: self.name.clone(),
                reference: self.native.to_string(),
            }),
        };
        match native {
            Ok(native) => self.module.registry_mut().register_enum(EnumDecl::new(self.name, native)),
            Err(error) => {
                self.module.record(error.clone());
                Err(error)
            }
        }
    }
}

fn mirror(entity: &str, native: &NativeEnum, declared: NativeEnum) -> Result<NativeEnum, RegistrationError> {
    if declared.repr != native.repr {
        return Err(RegistrationError::InvalidMember {
            entity: entity.to_string(),
            member: "repr".to_string(),
            reason: format!("declared {} but the native enum is {}", declared.repr.primitive(), native.repr.primitive()),
        });
    }
    for (name, value) in &declared.variants {
        let native_value = native.variants.iter().find(|(n, _)| n == name).map(|(_, v)| *v);
        if native_value != Some(*value) {
            return Err(RegistrationError::InvalidMember {
                entity: entity.to_string(),
                member: name.clone(),
                reason: format!("declared as {value} but the native enum has {native_value:?}"),
            });
        }
    }
    if declared.variants.len() != native.variants.len() {
        return Err(RegistrationError::InvalidMember {
            entity: entity.to_string(),
            member: "variants".to_string(),
            reason: format!(
                "declares {} of {} native variants",
                declared.variants.len(),
                native.variants.len()
            ),
        });
    }
    Ok(declared)
}
