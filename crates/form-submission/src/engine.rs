//! Per-form submission engine.
//!
//! The only state kept between submissions is a sequence counter. Each
//! submission is tagged when its intent is resolved; a validation response
//! is applied only if it belongs to the latest submission, so a slow
//! response for an older submission can never overwrite a newer result.

use form_path::Path;

use crate::config::{ConfigError, EngineConfig};
use crate::diagnostic::Diagnostic;
use crate::errors::ErrorSet;
use crate::intent::{resolve_intent, Intent};
use crate::mapper::{map_errors, rebase_path};
use crate::mutate::{apply_intent, ListEdit};
use crate::result::{ResultParts, SubmissionResult};
use crate::tree::{build_tree, FormPair};
use crate::validator::Validator;
use crate::value::Value;

/// A submission whose tree is ready and whose validation may still be in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    sequence: u64,
    intent: Intent,
    payload: Value,
    edit: Option<ListEdit>,
    touched: Vec<Path>,
    diagnostics: Vec<Diagnostic>,
    needs_validation: bool,
}

impl PendingSubmission {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// The mutated tree, as handed to the validator.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn edit(&self) -> Option<&ListEdit> {
        self.edit.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// False for list intents when list revalidation is disabled.
    pub fn needs_validation(&self) -> bool {
        self.needs_validation
    }
}

#[derive(Debug, Clone)]
pub struct FormEngine {
    config: EngineConfig,
    latest: u64,
    settled: Option<u64>,
}

impl FormEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.check()?;
        Ok(Self {
            config,
            latest: 0,
            settled: None,
        })
    }

    /// Create an engine for a form declaring `fields`, rejecting any that
    /// collide with the intent field.
    pub fn with_fields<'a>(
        config: EngineConfig,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConfigError> {
        config.check_fields(fields)?;
        Self::new(config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sequence number of the most recently prepared submission (0 before the first).
    pub fn latest_sequence(&self) -> u64 {
        self.latest
    }

    /// Resolve the intent, build and mutate the tree, and tag the submission.
    pub fn prepare(&mut self, pairs: &[FormPair]) -> PendingSubmission {
        let resolved = resolve_intent(pairs, &self.config.intent_field);
        let parsed = build_tree(&resolved.pairs);
        let mutation = apply_intent(&parsed.root, &resolved.intent);

        let touched = match &mutation.edit {
            Some(edit) => parsed
                .touched
                .iter()
                .filter_map(|path| rebase_path(edit, path))
                .collect(),
            None => parsed.touched,
        };
        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(resolved.diagnostic);

        self.latest += 1;
        let needs_validation = !resolved.intent.is_structural() || self.config.revalidate_list_intents;
        tracing::debug!(
            sequence = self.latest,
            intent = %resolved.intent,
            diagnostics = diagnostics.len(),
            "prepared submission"
        );

        PendingSubmission {
            sequence: self.latest,
            intent: resolved.intent,
            payload: mutation.tree,
            edit: mutation.edit,
            touched,
            diagnostics,
            needs_validation,
        }
    }

    /// Apply a validation response to `pending`. `previous` is the error set
    /// of the last result the caller rendered.
    ///
    /// Returns `None`, discarding the response, when `pending` has been
    /// superseded by a later [`prepare`](Self::prepare) or was already completed.
    pub fn complete(
        &mut self,
        pending: PendingSubmission,
        raw_errors: Option<ErrorSet>,
        previous: Option<&ErrorSet>,
    ) -> Option<SubmissionResult> {
        if pending.sequence != self.latest || self.settled == Some(pending.sequence) {
            tracing::debug!(
                sequence = pending.sequence,
                latest = self.latest,
                "discarding stale validation response"
            );
            return None;
        }
        self.settled = Some(pending.sequence);
        Some(settle(pending, raw_errors, previous))
    }

    /// Prepare, validate and complete in one synchronous step.
    pub fn submit(
        &mut self,
        pairs: &[FormPair],
        validator: &dyn Validator,
        previous: Option<&ErrorSet>,
    ) -> SubmissionResult {
        let pending = self.prepare(pairs);
        let raw = pending
            .needs_validation
            .then(|| validator.validate(&pending.payload));
        self.settled = Some(pending.sequence);
        settle(pending, raw, previous)
    }
}

fn settle(
    pending: PendingSubmission,
    raw_errors: Option<ErrorSet>,
    previous: Option<&ErrorSet>,
) -> SubmissionResult {
    let raw = raw_errors.filter(|_| pending.needs_validation);
    let errors = map_errors(
        &pending.intent,
        pending.edit.as_ref(),
        raw.as_ref(),
        previous,
    );
    SubmissionResult::new(ResultParts {
        sequence: pending.sequence,
        intent: pending.intent,
        payload: pending.payload,
        errors,
        touched: pending.touched,
        diagnostics: pending.diagnostics,
        validated: raw.is_some(),
    })
}
