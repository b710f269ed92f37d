//! Flat submitted pairs to a nested value tree.

use form_path::{MalformedPath, Path, Segment};
use indexmap::IndexSet;

use crate::diagnostic::Diagnostic;
use crate::value::{FileHandle, Fields, NodeKind, Scalar, Value};

/// A control value as collected from the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    File(FileHandle),
}

impl From<FieldValue> for Scalar {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Text(s) => Scalar::Text(s),
            FieldValue::Bool(b) => Scalar::Bool(b),
            FieldValue::File(f) => Scalar::File(f),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(f: FileHandle) -> Self {
        FieldValue::File(f)
    }
}

/// One `(name, value)` pair, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPair {
    pub name: String,
    pub value: FieldValue,
}

impl FormPair {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<FieldValue>> From<(N, V)> for FormPair {
    fn from((name, value): (N, V)) -> Self {
        FormPair::new(name, value)
    }
}

/// The tree built from one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedForm {
    pub root: Value,
    /// Paths present in the input, deduplicated, in first-arrival order.
    pub touched: Vec<Path>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Incremental tree builder. Feed pairs in document order, then [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Option<Value>,
    touched: IndexSet<Path>,
    diagnostics: Vec<Diagnostic>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: &FormPair) {
        let path = match form_path::parse(&pair.name) {
            Ok(path) if !path.is_root() => path,
            Ok(_) => return self.malformed(&pair.name, MalformedPath::EmptySegment),
            Err(error) => return self.malformed(&pair.name, error),
        };

        let repeated = self.touched.contains(&path);
        let root = self.root.get_or_insert_with(|| match path.first() {
            Some(Segment::Index(_)) => Value::List(Vec::new()),
            _ => Value::Object(Fields::new()),
        });

        let mut conflicts = Vec::new();
        insert(root, &path, pair.value.clone().into(), repeated, &mut conflicts);
        for (at, previous) in conflicts {
            tracing::warn!(path = %at, previous = %previous, "conflicting field kinds, later value wins");
            self.diagnostics.push(Diagnostic::ConflictingPath { path: at, previous });
        }
        self.touched.insert(path);
    }

    pub fn finish(self) -> ParsedForm {
        ParsedForm {
            root: self.root.unwrap_or_else(Value::empty_object),
            touched: self.touched.into_iter().collect(),
            diagnostics: self.diagnostics,
        }
    }

    fn malformed(&mut self, name: &str, error: MalformedPath) {
        tracing::warn!(field = name, error = %error, "skipping malformed field name");
        self.diagnostics.push(Diagnostic::MalformedPath {
            name: name.to_string(),
            error,
        });
    }
}

/// Build a tree from pairs in document order.
///
/// # Example
///
/// ```
/// use form_submission::{build_tree, FormPair};
/// use serde_json::json;
///
/// let pairs = [
///     FormPair::new("email", "a@b.com"),
///     FormPair::new("tasks[0].name", "buy milk"),
/// ];
/// let parsed = build_tree(&pairs);
/// assert_eq!(
///     serde_json::Value::from(&parsed.root),
///     json!({"email": "a@b.com", "tasks": [{"name": "buy milk"}]})
/// );
/// ```
pub fn build_tree<'a>(pairs: impl IntoIterator<Item = &'a FormPair>) -> ParsedForm {
    let mut builder = TreeBuilder::new();
    for pair in pairs {
        builder.push(pair);
    }
    builder.finish()
}

fn insert(
    root: &mut Value,
    path: &Path,
    scalar: Scalar,
    repeated: bool,
    conflicts: &mut Vec<(Path, NodeKind)>,
) {
    let mut node = root;
    for (depth, segment) in path.iter().enumerate() {
        let Some(next) = descend(node, segment, path, depth, conflicts) else {
            return;
        };
        node = next;
    }
    assign(node, scalar, repeated, path, conflicts);
}

/// Step into the child named by `segment`, coercing `node` into the matching
/// container kind and creating the child slot if missing.
fn descend<'a>(
    node: &'a mut Value,
    segment: &Segment,
    path: &Path,
    depth: usize,
    conflicts: &mut Vec<(Path, NodeKind)>,
) -> Option<&'a mut Value> {
    let wanted = match segment {
        Segment::Key(_) => NodeKind::Object,
        Segment::Index(_) => NodeKind::List,
    };
    if node.kind() != wanted {
        if !node.is_null() {
            conflicts.push((Path::new(path.segments()[..depth].to_vec()), node.kind()));
        }
        *node = match segment {
            Segment::Key(_) => Value::Object(Fields::new()),
            Segment::Index(_) => Value::List(Vec::new()),
        };
    }
    match (node, segment) {
        (Value::Object(fields), Segment::Key(key)) => Some(fields.entry(key.clone()).or_insert(Value::Null)),
        (Value::List(items), Segment::Index(index)) => {
            if items.len() <= *index {
                items.resize(index.checked_add(1)?, Value::Null);
            }
            items.get_mut(*index)
        }
        _ => None,
    }
}

fn assign(
    slot: &mut Value,
    scalar: Scalar,
    repeated: bool,
    path: &Path,
    conflicts: &mut Vec<(Path, NodeKind)>,
) {
    let incoming = Value::Scalar(scalar);
    match slot {
        Value::Null => *slot = incoming,
        // Checkbox groups and multi-selects submit the same name repeatedly.
        Value::Scalar(_) if repeated => {
            let first = std::mem::replace(slot, Value::Null);
            *slot = Value::List(vec![first, incoming]);
        }
        Value::List(items) if repeated => items.push(incoming),
        Value::Scalar(_) => *slot = incoming,
        _ => {
            conflicts.push((path.clone(), slot.kind()));
            *slot = incoming;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(pairs: &[(&str, &str)]) -> ParsedForm {
        let pairs: Vec<FormPair> = pairs.iter().map(|&p| FormPair::from(p)).collect();
        build_tree(&pairs)
    }

    fn json_of(parsed: &ParsedForm) -> serde_json::Value {
        serde_json::Value::from(&parsed.root)
    }

    #[test]
    fn test_nested_objects_and_lists() {
        let parsed = tree(&[
            ("tasks[0].name", "a"),
            ("tasks[0].tags[0]", "x"),
            ("tasks[1].name", "b"),
            ("owner.address.city", "Oslo"),
        ]);
        assert_eq!(
            json_of(&parsed),
            json!({
                "tasks": [{"name": "a", "tags": ["x"]}, {"name": "b"}],
                "owner": {"address": {"city": "Oslo"}}
            })
        );
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_repeated_name_promotes_to_list() {
        let parsed = tree(&[("topics", "rust"), ("topics", "forms"), ("topics", "web")]);
        assert_eq!(json_of(&parsed), json!({"topics": ["rust", "forms", "web"]}));
        assert_eq!(parsed.touched.len(), 1);
    }

    #[test]
    fn test_sparse_list_is_padded() {
        let parsed = tree(&[("tasks[2].name", "c")]);
        assert_eq!(json_of(&parsed), json!({"tasks": [null, null, {"name": "c"}]}));
    }

    #[test]
    fn test_index_past_limit_is_skipped() {
        let max = format!("a[{}]", usize::MAX);
        let pairs = [FormPair::new("a[0]", "keep"), FormPair::new(max.as_str(), "x")];
        let parsed = build_tree(&pairs);
        assert_eq!(json_of(&parsed), json!({"a": ["keep"]}));
        assert!(matches!(
            parsed.diagnostics.as_slice(),
            [Diagnostic::MalformedPath { error: MalformedPath::IndexTooLarge(_), .. }]
        ));
    }

    #[test]
    fn test_huge_index_does_not_pad() {
        let parsed = tree(&[("a[4000000000]", "x"), ("b", "y")]);
        assert_eq!(json_of(&parsed), json!({"b": "y"}));
        assert_eq!(parsed.diagnostics.len(), 1);
    }

    #[test]
    fn test_index_at_limit_is_padded() {
        let name = format!("a[{}]", form_path::MAX_LIST_INDEX);
        let pairs = [FormPair::new(name.as_str(), "x")];
        let parsed = build_tree(&pairs);
        let list = parsed.root.get(&form_path::parse("a").unwrap()).and_then(Value::as_list).unwrap();
        assert_eq!(list.len(), form_path::MAX_LIST_INDEX + 1);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_top_level_list_form() {
        let parsed = tree(&[("[0].title", "a"), ("[1].title", "b")]);
        assert_eq!(json_of(&parsed), json!([{"title": "a"}, {"title": "b"}]));
    }

    #[test]
    fn test_conflicting_container_last_write_wins() {
        let parsed = tree(&[("a.b", "1"), ("a[0]", "2")]);
        assert_eq!(json_of(&parsed), json!({"a": ["2"]}));
        assert_eq!(
            parsed.diagnostics,
            vec![Diagnostic::ConflictingPath {
                path: form_path::parse("a").unwrap(),
                previous: NodeKind::Object,
            }]
        );
    }

    #[test]
    fn test_scalar_then_container_conflict() {
        let parsed = tree(&[("a", "1"), ("a.b", "2")]);
        assert_eq!(json_of(&parsed), json!({"a": {"b": "2"}}));
        assert_eq!(parsed.diagnostics.len(), 1);
    }

    #[test]
    fn test_container_then_scalar_conflict() {
        let parsed = tree(&[("a.b", "1"), ("a", "2")]);
        assert_eq!(json_of(&parsed), json!({"a": "2"}));
        assert!(matches!(
            parsed.diagnostics.as_slice(),
            [Diagnostic::ConflictingPath { previous: NodeKind::Object, .. }]
        ));
    }

    #[test]
    fn test_malformed_pair_is_skipped() {
        let parsed = tree(&[("email", "a@b.com"), ("tasks[", "x"), ("", "y")]);
        assert_eq!(json_of(&parsed), json!({"email": "a@b.com"}));
        assert_eq!(parsed.diagnostics.len(), 2);
        assert_eq!(parsed.touched, vec![form_path::parse("email").unwrap()]);
    }

    #[test]
    fn test_empty_input_is_empty_object() {
        let pairs: [FormPair; 0] = [];
        let parsed = build_tree(&pairs);
        assert_eq!(parsed.root, Value::empty_object());
    }

    #[test]
    fn test_boolean_and_file_values() {
        let pairs = [
            FormPair::new("agree", true),
            FormPair::new("cv", FileHandle::new("cv.pdf", 10)),
        ];
        let parsed = build_tree(&pairs);
        assert_eq!(parsed.root.get(&form_path::parse("agree").unwrap()), Some(&Value::bool(true)));
        assert!(matches!(
            parsed.root.get(&form_path::parse("cv").unwrap()),
            Some(Value::Scalar(Scalar::File(_)))
        ));
    }
}
