//! The immutable outcome of one submission.

use form_path::Path;
use serde_json::json;

use crate::diagnostic::Diagnostic;
use crate::errors::ErrorSet;
use crate::intent::Intent;
use crate::value::Value;

/// Everything the binding layer needs to re-render after a submission.
///
/// Constructed once per submission and superseded entirely by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    sequence: u64,
    intent: Intent,
    payload: Value,
    errors: ErrorSet,
    touched: Vec<Path>,
    diagnostics: Vec<Diagnostic>,
    accepted: bool,
}

pub(crate) struct ResultParts {
    pub sequence: u64,
    pub intent: Intent,
    pub payload: Value,
    pub errors: ErrorSet,
    pub touched: Vec<Path>,
    pub diagnostics: Vec<Diagnostic>,
    pub validated: bool,
}

impl SubmissionResult {
    pub(crate) fn new(parts: ResultParts) -> Self {
        // Only a validated plain submit with no errors is terminal.
        let accepted = matches!(parts.intent, Intent::Submit) && parts.validated && parts.errors.is_empty();
        Self {
            sequence: parts.sequence,
            intent: parts.intent,
            payload: parts.payload,
            errors: parts.errors,
            touched: parts.touched,
            diagnostics: parts.diagnostics,
            accepted,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    /// Paths present in the submitted data, re-addressed through any list edit.
    pub fn touched(&self) -> &[Path] {
        &self.touched
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "sequence": self.sequence,
            "intent": self.intent.to_string(),
            "accepted": self.accepted,
            "payload": serde_json::Value::from(&self.payload),
            "errors": self.errors.to_json(),
            "touched": self.touched.iter().map(Path::to_string).collect::<Vec<_>>(),
            "diagnostics": self.diagnostics.iter().map(Diagnostic::to_string).collect::<Vec<_>>(),
        })
    }
}
