use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully qualified native name, e.g. `OIIO::ImageSpec::SerialFormat`.
///
/// Native symbols are keyed by their qualified name; exported names are
/// derived from the simple name unless the author overrides them.
///
/// # Examples
///
/// ```
/// use flatbind_core::QualifiedName;
///
/// let roi = QualifiedName::from_qualified_string("OIIO::ROI");
/// assert_eq!(roi.simple_name(), "ROI");
/// assert_eq!(roi.to_string(), "OIIO::ROI");
///
/// let global = QualifiedName::global("getattribute");
/// assert!(global.is_global());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Simple name (e.g. "ImageSpec", "open")
    pub name: String,
    /// Enclosing namespaces and classes, outermost first
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a qualified name with an explicit namespace path.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Parse `A::B::C`. A leading `::` is ignored.
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split("::")
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    pub fn simple_name(&self) -> &str {
        &self.name
    }

    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Name nested inside this one (`OIIO::ImageSpec` + `SerialFormat`).
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut namespace = self.namespace.clone();
        namespace.push(self.name.clone());
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Identifier-safe spelling with `_` separators, used for instantiation
    /// names when the author does not choose one.
    pub fn flat_identifier(&self) -> String {
        let mut out = self.namespace.join("_");
        if !out.is_empty() {
            out.push('_');
        }
        out.push_str(&self.name);
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested() {
        let name = QualifiedName::from_qualified_string("OIIO::ImageSpec::SerialFormat");
        assert_eq!(name.name, "SerialFormat");
        assert_eq!(name.namespace, vec!["OIIO".to_string(), "ImageSpec".to_string()]);
        assert!(!name.is_global());
    }

    #[test]
    fn parse_leading_separator() {
        let a = QualifiedName::from_qualified_string("::OIIO::ROI");
        let b = QualifiedName::from_qualified_string("OIIO::ROI");
        assert_eq!(a, b);
    }

    #[test]
    fn parse_empty() {
        let name = QualifiedName::from_qualified_string("");
        assert_eq!(name.name, "");
        assert!(name.is_global());
    }

    #[test]
    fn display_round_trip() {
        let name = QualifiedName::new("TypeDesc", vec!["OIIO".into()]);
        let parsed = QualifiedName::from_qualified_string(&name.to_string());
        assert_eq!(name, parsed);
    }

    #[test]
    fn child_appends_segment() {
        let spec = QualifiedName::from("OIIO::ImageSpec");
        assert_eq!(spec.child("SerialFormat").to_string(), "OIIO::ImageSpec::SerialFormat");
    }

    #[test]
    fn flat_identifier_joins_with_underscores() {
        assert_eq!(QualifiedName::from("OIIO::ROI").flat_identifier(), "OIIO_ROI");
        assert_eq!(QualifiedName::global("geterror").flat_identifier(), "geterror");
    }
}
