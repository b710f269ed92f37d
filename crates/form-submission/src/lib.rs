//! Submission engine for structured forms.
//!
//! Turns the flat `(name, value)` pairs of a form submission into a nested
//! value tree, applies the structural edit requested by the submit control
//! (insert, remove, reorder or replace a list element), and reconciles
//! validator output with the edited tree.
//!
//! ```text
//! pairs ──► resolve_intent ──► build_tree ──► apply_intent ──► validator
//!                                                   │              │
//!                                                   └─► map_errors ◄┘ ──► SubmissionResult
//! ```
//!
//! # Example
//!
//! ```
//! use form_submission::{AcceptAll, EngineConfig, FormEngine, FormPair};
//! use serde_json::json;
//!
//! let mut engine = FormEngine::new(EngineConfig::default()).unwrap();
//! let pairs = [
//!     FormPair::new("email", "a@b.com"),
//!     FormPair::new("tasks[0].name", "buy milk"),
//! ];
//! let result = engine.submit(&pairs, &AcceptAll, None);
//! assert!(result.accepted());
//! assert_eq!(
//!     serde_json::Value::from(result.payload()),
//!     json!({"email": "a@b.com", "tasks": [{"name": "buy milk"}]})
//! );
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod errors;
pub mod intent;
pub mod mapper;
pub mod mutate;
pub mod result;
pub mod shape;
pub mod tree;
pub mod validator;
pub mod value;

pub use config::{ConfigError, EngineConfig, DEFAULT_INTENT_FIELD};
pub use diagnostic::Diagnostic;
pub use engine::{FormEngine, PendingSubmission};
pub use errors::ErrorSet;
pub use intent::{format_intent, parse_intent, resolve_intent, Intent, ResolvedIntent, UnknownIntent};
pub use mapper::{map_errors, rebase_errors, rebase_path};
pub use mutate::{apply_intent, apply_intent_mut, ListEdit, Mutation};
pub use result::SubmissionResult;
pub use shape::{Field, Shape};
pub use tree::{build_tree, FieldValue, FormPair, ParsedForm, TreeBuilder};
pub use validator::{AcceptAll, Fallible, Validator};
pub use value::{empty_like, FileHandle, NodeKind, Scalar, Value};

pub use form_path::{MalformedPath, Path, Segment};
