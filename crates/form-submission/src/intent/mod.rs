//! Intents carried by the control that triggered a submission.
//!
//! The submitter writes one reserved field (the intent carrier) whose value
//! is a formatted intent string such as `list-insert(tasks,2)`. Absence of
//! the carrier means plain `submit`.
//!
//! # Vocabulary
//!
//! `submit`, `validate(<path?>)`, `list-insert(<path>,<index?>,<json?>)`,
//! `list-remove(<path>,<index>)`, `list-reorder(<path>,<from>,<to>)`,
//! `list-replace(<path>,<index>,<json?>)`.

pub mod codec;

use form_path::{MalformedPath, Path};
use thiserror::Error;

use crate::diagnostic::Diagnostic;
use crate::tree::{FieldValue, FormPair};
use crate::value::Value;

pub use codec::{format_intent, parse_intent};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnknownIntent {
    #[error("unknown intent name: {0:?}")]
    Name(String),
    #[error("malformed intent arguments")]
    Arguments,
    #[error("invalid intent path: {0}")]
    Path(#[from] MalformedPath),
    #[error("invalid intent index: {0:?}")]
    Index(String),
    #[error("invalid intent value: {0}")]
    Value(String),
    #[error("intent carrier is not text")]
    NotText,
}

/// The structured request encoded by the submitter.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Submit,
    /// Validate one subtree, or the whole form when `path` is `None`.
    Validate { path: Option<Path> },
    /// Insert at `index` (append when `None` or past the end).
    ListInsert {
        path: Path,
        index: Option<usize>,
        default_value: Option<Value>,
    },
    ListRemove { path: Path, index: usize },
    ListReorder { path: Path, from: usize, to: usize },
    /// Overwrite in place. A `None` value resets the element to a blank of its own shape.
    ListReplace {
        path: Path,
        index: usize,
        value: Option<Value>,
    },
}

impl Intent {
    /// Validate the subtree at `path`. The root path means the whole form.
    pub fn validate(path: Path) -> Self {
        if path.is_root() {
            return Intent::validate_all();
        }
        Intent::Validate { path: Some(path) }
    }

    pub fn validate_all() -> Self {
        Intent::Validate { path: None }
    }

    pub fn insert(path: Path, index: Option<usize>) -> Self {
        Intent::ListInsert {
            path,
            index,
            default_value: None,
        }
    }

    pub fn remove(path: Path, index: usize) -> Self {
        Intent::ListRemove { path, index }
    }

    pub fn reorder(path: Path, from: usize, to: usize) -> Self {
        Intent::ListReorder { path, from, to }
    }

    pub fn replace(path: Path, index: usize, value: Value) -> Self {
        Intent::ListReplace {
            path,
            index,
            value: Some(value),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Intent::Submit => "submit",
            Intent::Validate { .. } => "validate",
            Intent::ListInsert { .. } => "list-insert",
            Intent::ListRemove { .. } => "list-remove",
            Intent::ListReorder { .. } => "list-reorder",
            Intent::ListReplace { .. } => "list-replace",
        }
    }

    /// The list path a structural intent operates on.
    pub fn list_path(&self) -> Option<&Path> {
        match self {
            Intent::ListInsert { path, .. }
            | Intent::ListRemove { path, .. }
            | Intent::ListReorder { path, .. }
            | Intent::ListReplace { path, .. } => Some(path),
            Intent::Submit | Intent::Validate { .. } => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.list_path().is_some()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_intent(self))
    }
}

impl std::str::FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_intent(s)
    }
}

/// The intent of a submission and the form data with the carrier removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIntent {
    pub intent: Intent,
    pub pairs: Vec<FormPair>,
    pub diagnostic: Option<Diagnostic>,
}

/// Read the intent carrier from `pairs` and strip it from the form data.
///
/// When the carrier appears more than once the last value wins. A carrier
/// that does not parse falls back to [`Intent::Submit`].
///
/// # Example
///
/// ```
/// use form_submission::{resolve_intent, FormPair, Intent};
///
/// let pairs = [
///     FormPair::new("tasks[0].name", "a"),
///     FormPair::new("__intent__", "list-remove(tasks,0)"),
/// ];
/// let resolved = resolve_intent(&pairs, "__intent__");
/// assert_eq!(resolved.intent, Intent::remove("tasks".parse().unwrap(), 0));
/// assert_eq!(resolved.pairs.len(), 1);
/// ```
pub fn resolve_intent(pairs: &[FormPair], carrier: &str) -> ResolvedIntent {
    let mut raw: Option<&FieldValue> = None;
    let mut data = Vec::with_capacity(pairs.len());
    for pair in pairs {
        if pair.name == carrier {
            raw = Some(&pair.value);
        } else {
            data.push(pair.clone());
        }
    }

    let parsed = match raw {
        None => Ok(Intent::Submit),
        Some(FieldValue::Text(text)) => parse_intent(text).map_err(|error| (text.clone(), error)),
        Some(_) => Err((String::new(), UnknownIntent::NotText)),
    };

    match parsed {
        Ok(intent) => ResolvedIntent {
            intent,
            pairs: data,
            diagnostic: None,
        },
        Err((raw, error)) => {
            tracing::warn!(intent = %raw, error = %error, "unknown intent, falling back to submit");
            ResolvedIntent {
                intent: Intent::Submit,
                pairs: data,
                diagnostic: Some(Diagnostic::UnknownIntent { raw, error }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARRIER: &str = "__intent__";

    #[test]
    fn test_missing_carrier_is_submit() {
        let pairs = [FormPair::new("email", "a@b.com")];
        let resolved = resolve_intent(&pairs, CARRIER);
        assert_eq!(resolved.intent, Intent::Submit);
        assert_eq!(resolved.pairs, pairs.to_vec());
        assert!(resolved.diagnostic.is_none());
    }

    #[test]
    fn test_malformed_carrier_falls_back() {
        let pairs = [FormPair::new(CARRIER, "explode(tasks)"), FormPair::new("email", "x")];
        let resolved = resolve_intent(&pairs, CARRIER);
        assert_eq!(resolved.intent, Intent::Submit);
        assert_eq!(resolved.pairs, vec![FormPair::new("email", "x")]);
        assert!(matches!(
            resolved.diagnostic,
            Some(Diagnostic::UnknownIntent { error: UnknownIntent::Name(_), .. })
        ));
    }

    #[test]
    fn test_non_text_carrier_falls_back() {
        let pairs = [FormPair::new(CARRIER, true)];
        let resolved = resolve_intent(&pairs, CARRIER);
        assert_eq!(resolved.intent, Intent::Submit);
        assert!(resolved.pairs.is_empty());
    }

    #[test]
    fn test_last_carrier_wins() {
        let pairs = [FormPair::new(CARRIER, "validate"), FormPair::new(CARRIER, "submit")];
        assert_eq!(resolve_intent(&pairs, CARRIER).intent, Intent::Submit);
    }

    #[test]
    fn test_list_path() {
        let path: Path = "tasks".parse().unwrap();
        assert_eq!(Intent::remove(path.clone(), 0).list_path(), Some(&path));
        assert_eq!(Intent::validate(path).list_path(), None);
        assert_eq!(Intent::validate(Path::root()), Intent::validate_all());
        assert!(!Intent::Submit.is_structural());
    }
}
