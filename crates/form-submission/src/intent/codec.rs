//! String codec for intent carrier values.
//!
//! `name` or `name(arg,arg,...)`. List insert and replace accept one more
//! trailing argument holding a JSON value (which may itself contain commas).

use form_path::Path;

use super::{Intent, UnknownIntent};
use crate::value::Value;

// ── Argument helpers ──────────────────────────────────────────────────────

fn split_call(raw: &str) -> Result<(&str, Option<&str>), UnknownIntent> {
    let raw = raw.trim();
    match raw.find('(') {
        None => Ok((raw, None)),
        Some(open) => {
            let inner = raw[open + 1..]
                .strip_suffix(')')
                .ok_or(UnknownIntent::Arguments)?;
            Ok((raw[..open].trim(), Some(inner)))
        }
    }
}

fn decode_path(arg: &str) -> Result<Path, UnknownIntent> {
    Ok(form_path::parse(arg.trim())?)
}

fn decode_index(arg: &str) -> Result<usize, UnknownIntent> {
    let arg = arg.trim();
    if !form_path::is_valid_index(arg) {
        return Err(UnknownIntent::Index(arg.to_string()));
    }
    arg.parse().map_err(|_| UnknownIntent::Index(arg.to_string()))
}

fn decode_optional_index(arg: Option<&str>) -> Result<Option<usize>, UnknownIntent> {
    match arg.map(str::trim) {
        None | Some("") => Ok(None),
        Some(arg) => decode_index(arg).map(Some),
    }
}

fn decode_value(arg: Option<&str>) -> Result<Option<Value>, UnknownIntent> {
    match arg.map(str::trim) {
        None | Some("") => Ok(None),
        Some(arg) => serde_json::from_str::<serde_json::Value>(arg)
            .map(|v| Some(Value::from(v)))
            .map_err(|e| UnknownIntent::Value(e.to_string())),
    }
}

fn encode_value(value: &Value) -> String {
    serde_json::Value::from(value).to_string()
}

/// Exactly `N` comma-separated arguments.
fn exact_args<const N: usize>(args: Option<&str>) -> Result<[&str; N], UnknownIntent> {
    let args = args.ok_or(UnknownIntent::Arguments)?;
    let parts: Vec<&str> = args.split(',').collect();
    parts.try_into().map_err(|_| UnknownIntent::Arguments)
}

// ── Decoding ──────────────────────────────────────────────────────────────

/// Parse an intent carrier value.
///
/// # Example
///
/// ```
/// use form_submission::{parse_intent, Intent};
///
/// let tasks = "tasks".parse().unwrap();
/// assert_eq!(parse_intent("submit").unwrap(), Intent::Submit);
/// assert_eq!(parse_intent("validate").unwrap(), Intent::validate_all());
/// assert_eq!(parse_intent("list-insert(tasks)").unwrap(), Intent::insert(tasks, None));
/// assert!(parse_intent("list-remove(tasks)").is_err());
/// ```
pub fn parse_intent(raw: &str) -> Result<Intent, UnknownIntent> {
    let (name, args) = split_call(raw)?;
    match name {
        "submit" => match args.map(str::trim) {
            None | Some("") => Ok(Intent::Submit),
            Some(_) => Err(UnknownIntent::Arguments),
        },
        "validate" => match args.map(str::trim) {
            None | Some("") => Ok(Intent::Validate { path: None }),
            Some(path) => Ok(Intent::Validate {
                path: Some(decode_path(path)?),
            }),
        },
        "list-insert" => {
            let mut parts = args.unwrap_or("").splitn(3, ',');
            let path = decode_path(parts.next().unwrap_or(""))?;
            let index = decode_optional_index(parts.next())?;
            let default_value = decode_value(parts.next())?;
            Ok(Intent::ListInsert {
                path,
                index,
                default_value,
            })
        }
        "list-remove" => {
            let [path, index] = exact_args(args)?;
            Ok(Intent::ListRemove {
                path: decode_path(path)?,
                index: decode_index(index)?,
            })
        }
        "list-reorder" => {
            let [path, from, to] = exact_args(args)?;
            Ok(Intent::ListReorder {
                path: decode_path(path)?,
                from: decode_index(from)?,
                to: decode_index(to)?,
            })
        }
        "list-replace" => {
            let mut parts = args.ok_or(UnknownIntent::Arguments)?.splitn(3, ',');
            let path = decode_path(parts.next().unwrap_or(""))?;
            let index = decode_index(parts.next().ok_or(UnknownIntent::Arguments)?)?;
            let value = decode_value(parts.next())?;
            Ok(Intent::ListReplace { path, index, value })
        }
        other => Err(UnknownIntent::Name(other.to_string())),
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────

/// Format an intent as a carrier value, suitable for a submit button's `value`.
///
/// # Example
///
/// ```
/// use form_submission::{format_intent, Intent};
///
/// let tasks = "tasks".parse().unwrap();
/// assert_eq!(format_intent(&Intent::reorder(tasks, 0, 2)), "list-reorder(tasks,0,2)");
/// ```
pub fn format_intent(intent: &Intent) -> String {
    match intent {
        Intent::Submit => "submit".to_string(),
        Intent::Validate { path: None } => "validate".to_string(),
        Intent::Validate { path: Some(path) } => format!("validate({path})"),
        Intent::ListInsert {
            path,
            index,
            default_value,
        } => {
            let index = index.map(|i| i.to_string()).unwrap_or_default();
            match default_value {
                Some(value) => format!("list-insert({path},{index},{})", encode_value(value)),
                None if index.is_empty() => format!("list-insert({path})"),
                None => format!("list-insert({path},{index})"),
            }
        }
        Intent::ListRemove { path, index } => format!("list-remove({path},{index})"),
        Intent::ListReorder { path, from, to } => format!("list-reorder({path},{from},{to})"),
        Intent::ListReplace { path, index, value } => match value {
            Some(value) => format!("list-replace({path},{index},{})", encode_value(value)),
            None => format!("list-replace({path},{index})"),
        },
    }
}
