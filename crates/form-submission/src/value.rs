//! The structured value tree built from a form submission.

use std::fmt;

use form_path::{Path, Segment};
use indexmap::IndexMap;
use serde_json::{json, Map, Number};

/// Ordered object fields. Insertion order is kept so re-rendering is stable.
pub type Fields = IndexMap<String, Value>;

/// An opaque reference to an uploaded file. Contents never pass through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A leaf value.
///
/// Dates, numbers typed into inputs and select options all arrive as text;
/// `Number` appears only in defaults and values supplied by callers.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Bool(bool),
    Number(f64),
    File(FileHandle),
}

/// A node in the form value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unset slot, used to pad sparse lists such as a lone `tasks[2]`.
    Null,
    Scalar(Scalar),
    List(Vec<Value>),
    Object(Fields),
}

/// The kind of a node, reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Scalar,
    List,
    Object,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Null => "null",
            NodeKind::Scalar => "scalar",
            NodeKind::List => "list",
            NodeKind::Object => "object",
        })
    }
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn number(n: f64) -> Self {
        Value::Scalar(Scalar::Number(n))
    }

    pub fn file(handle: FileHandle) -> Self {
        Value::Scalar(Scalar::File(handle))
    }

    pub fn empty_object() -> Self {
        Value::Object(Fields::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Value::Null => NodeKind::Null,
            Value::Scalar(_) => NodeKind::Scalar,
            Value::List(_) => NodeKind::List,
            Value::Object(_) => NodeKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Text that is empty or only whitespace, or an unset slot.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(Scalar::Text(s)) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Get the node at `path`.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = match (current, segment) {
                (Value::Object(fields), Segment::Key(key)) => fields.get(key)?,
                (Value::List(items), Segment::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Get a mutable reference to the node at `path`.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Value> {
        let mut current = self;
        for segment in path {
            current = match (current, segment) {
                (Value::Object(fields), Segment::Key(key)) => fields.get_mut(key)?,
                (Value::List(items), Segment::Index(index)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// A blank value with the same shape as `like`.
///
/// Objects keep their keys with blank children, lists become empty and
/// scalars become empty text. Used when a list insert carries no default.
pub fn empty_like(like: &Value) -> Value {
    match like {
        Value::Null | Value::Scalar(_) => Value::text(""),
        Value::List(_) => Value::List(Vec::new()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, child)| (key.clone(), empty_like(child)))
                .collect(),
        ),
    }
}

// ── JSON conversion ───────────────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::bool(b),
            serde_json::Value::Number(n) => Value::number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Scalar(Scalar::Text(s)) => serde_json::Value::String(s.clone()),
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Scalar(Scalar::Number(n)) => number_to_json(*n),
            Value::Scalar(Scalar::File(file)) => json!({
                "name": file.name,
                "size": file.size,
                "type": file.content_type,
            }),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        serde_json::Value::from(&v)
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return json!(n as i64);
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
