use std::fmt;

use crate::types::Mutability;

use super::{NativeFunction, NativeType};

/// Explicit overload selection.
///
/// Every unset part matches anything. A selector that matches nothing is an
/// unresolved reference; one that matches several overloads is ambiguous.
///
/// # Example
///
/// ```ignore
/// // void read_scanline(int y, int z, float* data)
/// let sel = Selector::named("read_scanline")
///     .with_params([NativeType::int(), NativeType::int(), NativeType::mut_ptr(NativeType::float())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub name: String,
    pub params: Option<Vec<NativeType>>,
    pub constness: Option<Mutability>,
    pub template_args: Option<Vec<NativeType>>,
}

impl Selector {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
            constness: None,
            template_args: None,
        }
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = NativeType>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    /// Select the `const` member function.
    pub fn constant(mut self) -> Self {
        self.constness = Some(Mutability::Const);
        self
    }

    /// Select the non-`const` member function.
    pub fn mutable(mut self) -> Self {
        self.constness = Some(Mutability::Mut);
        self
    }

    pub fn with_template_args(mut self, args: impl IntoIterator<Item = NativeType>) -> Self {
        self.template_args = Some(args.into_iter().collect());
        self
    }

    pub fn matches(&self, function: &NativeFunction) -> bool {
        if function.name != self.name && function.simple_name() != self.name {
            return false;
        }
        let params_match = self
            .params
            .as_ref()
            .is_none_or(|params| function.param_types().eq(params.iter()));
        let const_match = self
            .constness
            .is_none_or(|constness| constness.is_const() == function.is_const());
        let args_match = self
            .template_args
            .as_ref()
            .is_none_or(|args| &function.template_args == args);
        params_match && const_match && args_match
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::named(name)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(args) = &self.template_args {
            write!(f, "<")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        match &self.params {
            Some(params) => {
                write!(f, "(")?;
                for (i, ty) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, ")")?;
            }
            None => write!(f, "(..)")?,
        }
        match self.constness {
            Some(Mutability::Const) => write!(f, " const"),
            Some(Mutability::Mut) => write!(f, " mut"),
            None => Ok(()),
        }
    }
}
