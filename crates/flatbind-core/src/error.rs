//! Error types for registration and configuration.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError   - per-entity failures collected into Diagnostics
//! ├── DuplicateExportedName
//! ├── UnresolvedReference
//! ├── UnclassifiableType
//! ├── UnsupportedAdaptation
//! ├── InvalidMember
//! ├── AmbiguousSelection
//! ├── MissingExportedName
//! └── DuplicateInstantiation
//! ConfigError         - binding configuration could not be loaded
//! ```
//!
//! A `RegistrationError` is fatal for the entity it names and never for the
//! module; every error is collected so one pass reports every problem.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Slots
// ============================================================================

/// The part of a signature an error is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Receiver,
    Param(String),
    Return,
    Field(String),
    /// Member of a decomposed aggregate
    Member(String),
    /// The entity's own storage
    Layout,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Receiver => write!(f, "receiver"),
            Slot::Param(name) => write!(f, "param '{name}'"),
            Slot::Return => write!(f, "return"),
            Slot::Field(name) => write!(f, "field '{name}'"),
            Slot::Member(name) => write!(f, "member '{name}'"),
            Slot::Layout => write!(f, "layout"),
        }
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering entities or finalizing a module.
///
/// `entity` is always the module-wide name of the affected entity
/// (`Class`, `Class_method`, or a free function name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum RegistrationError {
    /// Two entities claim the same exported name.
    #[error("duplicate exported name '{name}': {first} and {second}")]
    DuplicateExportedName {
        name: String,
        /// Native selector of the first claimant
        first: String,
        /// Native selector of the second claimant
        second: String,
    },

    /// A native symbol or a module entity could not be found.
    #[error("'{entity}' references unresolved '{reference}'")]
    UnresolvedReference { entity: String, reference: String },

    /// No representation rule applies to a type.
    #[error("'{entity}' {slot}: type '{ty}' is unclassifiable")]
    UnclassifiableType { entity: String, slot: Slot, ty: String },

    /// No lowering rule produces a sound flat signature.
    #[error("'{entity}' {slot}: unsupported adaptation: {reason}")]
    UnsupportedAdaptation { entity: String, slot: Slot, reason: String },

    /// A member was declared on a class that cannot carry it.
    #[error("'{entity}': invalid member '{member}': {reason}")]
    InvalidMember { entity: String, member: String, reason: String },

    /// A selector matched more than one native overload.
    #[error("'{entity}': selector '{selector}' matches {candidates} overloads")]
    AmbiguousSelection {
        entity: String,
        selector: String,
        candidates: usize,
    },

    /// An explicit exported name is required but was not given.
    #[error("'{entity}': explicit exported name required: {reason}")]
    MissingExportedName { entity: String, reason: String },

    /// The same template instantiation was registered twice.
    #[error("duplicate instantiation of '{template}' for <{args}>, already exported as '{existing}'")]
    DuplicateInstantiation {
        template: String,
        args: String,
        existing: String,
    },
}

/// Plain discriminant of [`RegistrationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegistrationErrorKind {
    DuplicateExportedName,
    UnresolvedReference,
    UnclassifiableType,
    UnsupportedAdaptation,
    InvalidMember,
    AmbiguousSelection,
    MissingExportedName,
    DuplicateInstantiation,
}

impl fmt::Display for RegistrationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegistrationErrorKind::DuplicateExportedName => "duplicate exported name",
            RegistrationErrorKind::UnresolvedReference => "unresolved reference",
            RegistrationErrorKind::UnclassifiableType => "unclassifiable type",
            RegistrationErrorKind::UnsupportedAdaptation => "unsupported adaptation",
            RegistrationErrorKind::InvalidMember => "invalid member",
            RegistrationErrorKind::AmbiguousSelection => "ambiguous selection",
            RegistrationErrorKind::MissingExportedName => "missing exported name",
            RegistrationErrorKind::DuplicateInstantiation => "duplicate instantiation",
        };
        write!(f, "{s}")
    }
}

impl RegistrationError {
    pub fn kind(&self) -> RegistrationErrorKind {
        match self {
            RegistrationError::DuplicateExportedName { .. } => RegistrationErrorKind::DuplicateExportedName,
            RegistrationError::UnresolvedReference { .. } => RegistrationErrorKind::UnresolvedReference,
            RegistrationError::UnclassifiableType { .. } => RegistrationErrorKind::UnclassifiableType,
            RegistrationError::UnsupportedAdaptation { .. } => RegistrationErrorKind::UnsupportedAdaptation,
            RegistrationError::InvalidMember { .. } => RegistrationErrorKind::InvalidMember,
            RegistrationError::AmbiguousSelection { .. } => RegistrationErrorKind::AmbiguousSelection,
            RegistrationError::MissingExportedName { .. } => RegistrationErrorKind::MissingExportedName,
            RegistrationError::DuplicateInstantiation { .. } => RegistrationErrorKind::DuplicateInstantiation,
        }
    }

    /// Module-wide name of the entity this error excludes.
    pub fn entity(&self) -> &str {
        match self {
            RegistrationError::DuplicateExportedName { name, .. } => name,
            RegistrationError::DuplicateInstantiation { existing, .. } => existing,
            RegistrationError::UnresolvedReference { entity, .. }
            | RegistrationError::UnclassifiableType { entity, .. }
            | RegistrationError::UnsupportedAdaptation { entity, .. }
            | RegistrationError::InvalidMember { entity, .. }
            | RegistrationError::AmbiguousSelection { entity, .. }
            | RegistrationError::MissingExportedName { entity, .. } => entity,
        }
    }

    /// Re-home an error raised while building a member under its final name.
    pub fn with_entity(mut self, name: &str) -> Self {
        match &mut self {
            RegistrationError::UnresolvedReference { entity, .. }
            | RegistrationError::UnclassifiableType { entity, .. }
            | RegistrationError::UnsupportedAdaptation { entity, .. }
            | RegistrationError::InvalidMember { entity, .. }
            | RegistrationError::AmbiguousSelection { entity, .. }
            | RegistrationError::MissingExportedName { entity, .. } => *entity = name.to_string(),
            RegistrationError::DuplicateExportedName { .. } | RegistrationError::DuplicateInstantiation { .. } => {}
        }
        self
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors loading a binding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid binding config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read binding config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid symbol prefix '{0}': must be a C identifier")]
    InvalidPrefix(String),
}
