//! Template instantiation bookkeeping.
//!
//! Each `(template, argument list)` pair may be exported at most once per
//! module, under an explicit name. The table is consulted at registration so
//! the second attempt is rejected with the name of the first.

use flatbind_core::{NativeType, QualifiedName, RegistrationError, TypePath};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct InstantiationTable {
    entries: FxHashMap<(QualifiedName, Vec<NativeType>), String>,
}

impl InstantiationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an instantiation exported as `name`.
    pub fn claim(
        &mut self,
        template: &QualifiedName,
        args: &[NativeType],
        name: &str,
    ) -> Result<(), RegistrationError> {
        let key = (template.clone(), args.to_vec());
        if let Some(existing) = self.entries.get(&key) {
            return Err(RegistrationError::DuplicateInstantiation {
                template: template.to_string(),
                args: join_args(args),
                existing: existing.clone(),
            });
        }
        tracing::trace!(%template, args = %join_args(args), name, "instantiation claimed");
        self.entries.insert(key, name.to_string());
        Ok(())
    }

    /// Record a class template instance.
    pub fn claim_class(&mut self, path: &TypePath, name: &str) -> Result<(), RegistrationError> {
        self.claim(&path.name, &path.args, name)
    }

    /// Exported name of an instantiation, if registered.
    pub fn exported_as(&self, template: &QualifiedName, args: &[NativeType]) -> Option<&str> {
        self.entries
            .get(&(template.clone(), args.to_vec()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn join_args(args: &[NativeType]) -> String {
    args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
