//! Overload selection and exported-name assignment.
//!
//! Native overload sets are already expanded (template instantiations
//! included); selection picks exactly one candidate per registration, and
//! naming gives it an exported name without any implicit renaming.

use flatbind_core::{NativeFunction, RegistrationError, Selector};

/// Pick the single candidate matching `selector`.
///
/// `entity` names the registration for diagnostics.
pub fn select_overload<'a>(
    entity: &str,
    selector: &Selector,
    candidates: &'a [NativeFunction],
) -> Result<&'a NativeFunction, RegistrationError> {
    let mut matches = candidates.iter().filter(|f| selector.matches(f));
    let first = matches.next().ok_or_else(|| RegistrationError::UnresolvedReference {
        entity: entity.to_string(),
        reference: selector.to_string(),
    })?;
    let rest = matches.count();
    if rest > 0 {
        return Err(RegistrationError::AmbiguousSelection {
            entity: entity.to_string(),
            selector: selector.to_string(),
            candidates: rest + 1,
        });
    }
    tracing::trace!(entity, selector = %selector, chosen = %first, "selected overload");
    Ok(first)
}

/// Exported name of a selected overload.
///
/// An explicit name always wins. Without one the native simple name is kept;
/// function template instantiations have no natural name and must be named.
pub fn export_name(
    entity: &str,
    chosen: &NativeFunction,
    explicit: Option<&str>,
) -> Result<String, RegistrationError> {
    match explicit {
        Some(name) => {
            if !is_identifier(name) {
                return Err(RegistrationError::MissingExportedName {
                    entity: entity.to_string(),
                    reason: format!("'{name}' is not a valid identifier"),
                });
            }
            Ok(name.to_string())
        }
        None if !chosen.template_args.is_empty() => Err(RegistrationError::MissingExportedName {
            entity: entity.to_string(),
            reason: format!("template instantiation '{chosen}' needs a name"),
        }),
        None => Ok(chosen.simple_name().to_string()),
    }
}

/// Other overloads sharing the native name of `chosen`, not counting its
/// const twins. A non-zero count means the overload needs an explicit name.
pub fn sibling_overloads(chosen: &NativeFunction, candidates: &[NativeFunction]) -> usize {
    candidates
        .iter()
        .filter(|f| f.simple_name() == chosen.simple_name())
        .filter(|f| *f != chosen)
        .filter(|f| !are_const_twins(chosen, f))
        .count()
}

/// Whether `a` and `b` differ only in member constness.
pub fn are_const_twins(a: &NativeFunction, b: &NativeFunction) -> bool {
    a.is_const() != b.is_const()
        && a.name == b.name
        && a.template_args == b.template_args
        && a.param_types().eq(b.param_types())
}

/// C identifier check for exported names.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
