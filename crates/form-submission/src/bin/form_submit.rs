//! `form-submit`: run one submission through the engine.
//!
//! Usage:
//!   form-submit [config.toml]
//!
//! Reads `{"pairs": [[name, value], ...], "errors": {...}}` from stdin and
//! writes the submission result as JSON. Values are strings, booleans, or
//! `{"name", "size", "type"}` file objects. `errors` is the previous error
//! set and may be omitted. Every tree is accepted by the validator.

use std::io::{self, Read, Write};

use form_submission::{AcceptAll, EngineConfig, ErrorSet, FieldValue, FileHandle, FormEngine, FormPair};
use serde_json::Value as JsonValue;

fn decode_value(v: &JsonValue) -> Result<FieldValue, String> {
    match v {
        JsonValue::String(s) => Ok(FieldValue::Text(s.clone())),
        JsonValue::Bool(b) => Ok(FieldValue::Bool(*b)),
        JsonValue::Object(file) => {
            let name = file
                .get("name")
                .and_then(JsonValue::as_str)
                .ok_or("file value needs a \"name\"")?;
            let size = file.get("size").and_then(JsonValue::as_u64).unwrap_or(0);
            let mut handle = FileHandle::new(name, size);
            if let Some(content_type) = file.get("type").and_then(JsonValue::as_str) {
                handle = handle.with_content_type(content_type);
            }
            Ok(FieldValue::File(handle))
        }
        other => Err(format!("unsupported field value: {other}")),
    }
}

fn decode_pairs(input: &JsonValue) -> Result<Vec<FormPair>, String> {
    let pairs = input
        .get("pairs")
        .and_then(JsonValue::as_array)
        .ok_or("input must have a \"pairs\" array")?;
    pairs
        .iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([JsonValue::String(name), value]) => Ok(FormPair::new(name.clone(), decode_value(value)?)),
            _ => Err(format!("pair must be [name, value]: {pair}")),
        })
        .collect()
}

fn run(config: EngineConfig, input: &str) -> Result<String, String> {
    let input: JsonValue = serde_json::from_str(input).map_err(|e| e.to_string())?;
    let pairs = decode_pairs(&input)?;
    let previous = input.get("errors").map(ErrorSet::from_json);

    let mut engine = FormEngine::new(config).map_err(|e| e.to_string())?;
    let result = engine.submit(&pairs, &AcceptAll, previous.as_ref());
    serde_json::to_string_pretty(&result.to_json()).map_err(|e| e.to_string())
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run(config, buf.trim()) {
        Ok(output) => {
            let mut stdout = io::stdout();
            if stdout.write_all(output.as_bytes()).and_then(|_| stdout.write_all(b"\n")).is_err() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
