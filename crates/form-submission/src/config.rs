//! Engine configuration.
//!
//! ```toml
//! intent_field = "__intent__"
//! revalidate_list_intents = true
//! ```

use std::path::Path as FsPath;

use form_path::{MalformedPath, Segment};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_INTENT_FIELD: &str = "__intent__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("intent field {0:?} is not a single field name")]
    InvalidIntentField(String),
    #[error("field {field:?} collides with the intent field {intent_field:?}")]
    IntentFieldCollision { field: String, intent_field: String },
    #[error("declared field {name:?} is malformed: {error}")]
    MalformedField { name: String, error: MalformedPath },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Reserved field name carrying the submitter's intent.
    pub intent_field: String,
    /// Re-run the validator after list intents and merge its output into
    /// the edited list. When off, previous errors are only re-addressed.
    pub revalidate_list_intents: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            intent_field: DEFAULT_INTENT_FIELD.to_string(),
            revalidate_list_intents: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The intent field must parse as exactly one key.
    pub fn check(&self) -> Result<(), ConfigError> {
        match form_path::parse(&self.intent_field) {
            Ok(path) if path.len() == 1 && matches!(path.first(), Some(Segment::Key(_))) => Ok(()),
            _ => Err(ConfigError::InvalidIntentField(self.intent_field.clone())),
        }
    }

    /// Reject declared form fields whose top-level name is the intent field.
    pub fn check_fields<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
        for name in fields {
            let path = form_path::parse(name).map_err(|error| ConfigError::MalformedField {
                name: name.to_string(),
                error,
            })?;
            if path.first().and_then(Segment::as_key) == Some(self.intent_field.as_str()) {
                return Err(ConfigError::IntentFieldCollision {
                    field: name.to_string(),
                    intent_field: self.intent_field.clone(),
                });
            }
        }
        Ok(())
    }
}
