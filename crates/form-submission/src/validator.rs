//! The pluggable validator boundary.

use std::fmt::Display;

use form_path::Path;

use crate::errors::ErrorSet;
use crate::value::Value;

/// Computes the error set for a value tree.
///
/// Implementations must be total: a tree that parsed must always yield an
/// error set, with internal faults reported on the root path.
pub trait Validator {
    fn validate(&self, tree: &Value) -> ErrorSet;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> ErrorSet,
{
    fn validate(&self, tree: &Value) -> ErrorSet {
        self(tree)
    }
}

/// Accepts every tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _tree: &Value) -> ErrorSet {
        ErrorSet::new()
    }
}

/// Adapts a validator that can fail. A failure becomes one form-level message.
///
/// # Example
///
/// ```
/// use form_submission::{ErrorSet, Fallible, Validator, Value};
/// use form_path::Path;
///
/// let flaky = Fallible(|_: &Value| -> Result<ErrorSet, String> { Err("schema not loaded".into()) });
/// let errors = flaky.validate(&Value::empty_object());
/// assert_eq!(errors.get(&Path::root()), Some(&["schema not loaded".to_string()][..]));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F, E> Validator for Fallible<F>
where
    F: Fn(&Value) -> Result<ErrorSet, E>,
    E: Display,
{
    fn validate(&self, tree: &Value) -> ErrorSet {
        match (self.0)(tree) {
            Ok(errors) => errors,
            Err(error) => {
                tracing::warn!(error = %error, "validator failed, reporting form-level error");
                let mut errors = ErrorSet::new();
                errors.push(Path::root(), error.to_string());
                errors
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_validator() {
        let validator = |tree: &Value| {
            let mut errors = ErrorSet::new();
            if tree.get(&"email".parse().unwrap()).is_none() {
                errors.push("email".parse().unwrap(), "required");
            }
            errors
        };
        assert_eq!(validator.validate(&Value::empty_object()).len(), 1);
    }

    #[test]
    fn test_fallible_ok_passes_through() {
        let ok = Fallible(|_: &Value| -> Result<ErrorSet, std::fmt::Error> { Ok(ErrorSet::new()) });
        assert!(ok.validate(&Value::empty_object()).is_empty());
    }

    #[test]
    fn test_accept_all() {
        assert!(AcceptAll.validate(&Value::text("x")).is_empty());
    }
}
