//! Non-fatal data-quality issues found while processing a submission.

use std::fmt;

use form_path::{MalformedPath, Path};

use crate::intent::UnknownIntent;
use crate::value::NodeKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The field name could not be parsed; the pair was skipped.
    MalformedPath { name: String, error: MalformedPath },
    /// A later pair needed a different node kind at `path`; the later pair won.
    ConflictingPath { path: Path, previous: NodeKind },
    /// The intent carrier could not be parsed; the submission fell back to `submit`.
    UnknownIntent { raw: String, error: UnknownIntent },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedPath { name, error } => {
                write!(f, "malformed field name {name:?}: {error}")
            }
            Diagnostic::ConflictingPath { path, previous } => {
                write!(f, "conflicting field at \"{path}\": replaced {previous}")
            }
            Diagnostic::UnknownIntent { raw, error } => {
                write!(f, "unknown intent {raw:?}: {error}")
            }
        }
    }
}
