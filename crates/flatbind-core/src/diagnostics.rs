//! Collected registration failures.

use std::fmt;

use crate::error::RegistrationError;

/// Every registration failure of a module, in one place.
///
/// A generator must refuse to emit code while this is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<RegistrationError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: RegistrationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = RegistrationError>) {
        self.errors.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistrationError> {
        self.errors.iter()
    }

    /// Whether any error names `entity`.
    pub fn mentions(&self, entity: &str) -> bool {
        self.errors.iter().any(|e| e.entity() == entity)
    }

    /// Order by entity, then kind, then message; removes exact repeats.
    pub fn sort(&mut self) {
        self.errors.sort_by(|a, b| {
            (a.entity(), a.kind(), a.to_string()).cmp(&(b.entity(), b.kind(), b.to_string()))
        });
        self.errors.dedup();
    }

    pub fn into_vec(self) -> Vec<RegistrationError> {
        self.errors
    }

    /// `Ok(())` when empty, otherwise the first error.
    pub fn into_result(self) -> Result<(), RegistrationError> {
        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for Diagnostics {
    type Item = RegistrationError;
    type IntoIter = std::vec::IntoIter<RegistrationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a RegistrationError;
    type IntoIter = std::slice::Iter<'a, RegistrationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<RegistrationError> for Diagnostics {
    fn from(error: RegistrationError) -> Self {
        Self { errors: vec![error] }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
