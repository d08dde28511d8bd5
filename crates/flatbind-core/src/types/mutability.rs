use std::fmt;

use serde::{Deserialize, Serialize};

/// Constness of a pointer, reference, view, or method receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    #[default]
    Const,
    Mut,
}

impl Mutability {
    pub const fn from_const(is_const: bool) -> Self {
        if is_const { Mutability::Const } else { Mutability::Mut }
    }

    pub const fn is_const(self) -> bool {
        matches!(self, Mutability::Const)
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutability::Const => write!(f, "const"),
            Mutability::Mut => write!(f, "mut"),
        }
    }
}
