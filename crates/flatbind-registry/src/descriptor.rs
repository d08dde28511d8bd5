//! The finalized module descriptor.
//!
//! A [`ModuleDescriptor`] is the immutable output of finalize: every
//! surviving class, enum, and free function with unique exported names and
//! all-flat signatures, plus the smart pointer manifest. It is `Send + Sync`
//! and is shared through an `Arc`, so emitters for several target languages
//! can read it concurrently.

use std::collections::BTreeSet;
use std::sync::Arc;

use flatbind_core::{ClassEntity, Diagnostics, EnumEntity, FunctionEntity, SmartPointerKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abi::{self, CFunction};
use crate::layout::{self, FieldValue, LayoutError};

/// One entry of the smart pointer manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SmartPointerEntry {
    /// The smart pointer class
    pub handle: String,
    /// The class it dereferences to
    pub target: String,
    pub kind: SmartPointerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub module: String,
    pub symbol_prefix: String,
    /// Sorted by name
    pub classes: Vec<ClassEntity>,
    /// Sorted by name
    pub enums: Vec<EnumEntity>,
    /// Free functions, sorted by name
    pub functions: Vec<FunctionEntity>,
    /// Sorted by handle
    pub smart_pointers: Vec<SmartPointerEntry>,
}

impl ModuleDescriptor {
    pub fn class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumEntity> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Free function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionEntity> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Any function entity by module-wide key (`Class_name` or `name`).
    pub fn function_by_key(&self, key: &str) -> Option<&FunctionEntity> {
        self.all_functions().find(|f| f.export_key() == key)
    }

    /// Every function entity: class members in class order, then free functions.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionEntity> {
        self.classes
            .iter()
            .flat_map(|c| c.functions())
            .chain(self.functions.iter())
    }

    /// Every module-wide name: classes, enums, and function keys.
    pub fn entity_names(&self) -> BTreeSet<String> {
        self.classes
            .iter()
            .map(|c| c.name.clone())
            .chain(self.enums.iter().map(|e| e.name.clone()))
            .chain(self.all_functions().map(FunctionEntity::export_key))
            .collect()
    }

    /// Target class of a smart pointer handle.
    pub fn smart_pointer_target(&self, handle: &str) -> Option<&SmartPointerEntry> {
        self.smart_pointers.iter().find(|e| e.handle == handle)
    }

    pub fn entity_count(&self) -> usize {
        self.classes.len() + self.enums.len() + self.all_functions().count()
    }

    /// C declarations for every function.
    pub fn abi(&self) -> Vec<CFunction> {
        self.all_functions()
            .map(|f| abi::project(f, &self.symbol_prefix))
            .collect()
    }

    /// Encode a value of the value class `class` into its C layout.
    pub fn encode_value(&self, class: &str, values: &[FieldValue]) -> Result<Vec<u8>, LayoutError> {
        let entity = self.value_class(class)?;
        layout::encode(entity, values, &|name: &str| self.class(name).filter(|c| c.is_value()))
    }

    /// Decode a value of the value class `class` from its C layout.
    pub fn decode_value(&self, class: &str, bytes: &[u8]) -> Result<Vec<FieldValue>, LayoutError> {
        let entity = self.value_class(class)?;
        layout::decode(entity, bytes, &|name: &str| self.class(name).filter(|c| c.is_value()))
    }

    fn value_class(&self, class: &str) -> Result<&ClassEntity, LayoutError> {
        self.class(class)
            .filter(|c| c.is_value())
            .ok_or_else(|| LayoutError::UnknownClass(class.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors emitting a descriptor.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("module '{module}' has {} registration errors:\n{diagnostics}", .diagnostics.len())]
    Diagnostics { module: String, diagnostics: Diagnostics },

    #[error("cannot serialize descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of finalizing a registry: the descriptor and every registration
/// failure. Emission is refused while any failure remains.
#[derive(Debug, Clone)]
pub struct FinalizedModule {
    descriptor: Arc<ModuleDescriptor>,
    diagnostics: Diagnostics,
}

impl FinalizedModule {
    pub(crate) fn new(descriptor: ModuleDescriptor, diagnostics: Diagnostics) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The descriptor, whatever the diagnostics say. For tooling that
    /// inspects what did register.
    pub fn partial(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// The shareable descriptor, refused when diagnostics are non-empty.
    pub fn emit(&self) -> Result<Arc<ModuleDescriptor>, EmitError> {
        if !self.diagnostics.is_empty() {
            return Err(EmitError::Diagnostics {
                module: self.descriptor.module.clone(),
                diagnostics: self.diagnostics.clone(),
            });
        }
        Ok(Arc::clone(&self.descriptor))
    }

    /// JSON form of [`emit`](Self::emit).
    pub fn emit_json(&self) -> Result<String, EmitError> {
        Ok(self.emit()?.to_json()?)
    }

    /// C declarations of [`emit`](Self::emit).
    pub fn emit_c(&self) -> Result<String, EmitError> {
        let descriptor = self.emit()?;
        Ok(abi::render(&descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::{FunctionKind, RegistrationError, Representation};

    fn descriptor() -> ModuleDescriptor {
        let mut input = ClassEntity::new("ImageInput", "OIIO::ImageInput", Representation::OpaqueReference);
        input
            .methods
            .push(FunctionEntity::new("delete", FunctionKind::Destructor, "~OIIO::ImageInput").with_owner("ImageInput"));
        ModuleDescriptor {
            module: "oiio".into(),
            symbol_prefix: "oiio".into(),
            classes: vec![
                input,
                ClassEntity::new("ImageInputPtr", "std::unique_ptr<OIIO::ImageInput>", Representation::SmartPointer)
                    .with_smart_pointer("ImageInput", SmartPointerKind::Unique),
            ],
            enums: vec![],
            functions: vec![FunctionEntity::new("geterror", FunctionKind::Free, "OIIO::geterror()")],
            smart_pointers: vec![SmartPointerEntry {
                handle: "ImageInputPtr".into(),
                target: "ImageInput".into(),
                kind: SmartPointerKind::Unique,
            }],
        }
    }

    #[test]
    fn names_cover_members_and_free_functions() {
        let names = descriptor().entity_names();
        assert!(names.contains("ImageInput_delete"));
        assert!(names.contains("geterror"));
        assert!(names.contains("ImageInputPtr"));
        assert_eq!(descriptor().entity_count(), 4);
    }

    #[test]
    fn lookup_by_key() {
        let d = descriptor();
        assert_eq!(d.function_by_key("ImageInput_delete").unwrap().kind, FunctionKind::Destructor);
        assert!(d.function("delete").is_none());
        assert_eq!(d.smart_pointer_target("ImageInputPtr").unwrap().target, "ImageInput");
    }

    #[test]
    fn json_round_trip() {
        let d = descriptor();
        let json = d.to_json().unwrap();
        assert!(json.contains("\"representation\": \"smart_pointer\""));
        assert_eq!(ModuleDescriptor::from_json(&json).unwrap(), d);
    }

    #[test]
    fn emission_refused_with_diagnostics() {
        let diagnostics = Diagnostics::from(RegistrationError::UnresolvedReference {
            entity: "ImageBuf_spec".into(),
            reference: "OIIO::ImageBuf".into(),
        });
        let finalized = FinalizedModule::new(descriptor(), diagnostics);
        assert!(!finalized.is_clean());
        let err = finalized.emit().unwrap_err();
        assert!(err.to_string().contains("1 registration errors"));
        assert_eq!(finalized.partial().classes.len(), 2);

        assert!(matches!(finalized.emit_c(), Err(EmitError::Diagnostics { .. })));

        let clean = FinalizedModule::new(descriptor(), Diagnostics::new());
        assert!(clean.emit_json().is_ok());
        assert!(clean.emit_c().is_ok());
    }

    #[test]
    fn descriptor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModuleDescriptor>();
        assert_send_sync::<FinalizedModule>();
    }
}
