//! Per-path validation messages.

use form_path::{is_ancestor_or_equal, Path};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Validation messages keyed by path, in caller-visible order.
///
/// Messages are not deduplicated. The root path carries form-level errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    entries: IndexMap<Path, Vec<String>>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for `path`.
    pub fn push(&mut self, path: Path, message: impl Into<String>) {
        self.entries.entry(path).or_default().push(message.into());
    }

    /// Append messages for `path`. An empty list leaves the set untouched.
    pub fn extend_path(&mut self, path: Path, messages: impl IntoIterator<Item = String>) {
        let mut messages = messages.into_iter().peekable();
        if messages.peek().is_none() {
            return;
        }
        self.entries.entry(path).or_default().extend(messages);
    }

    pub fn get(&self, path: &Path) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[String])> {
        self.entries.iter().map(|(path, messages)| (path, messages.as_slice()))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Path, &[String]) -> bool) {
        self.entries.retain(|path, messages| keep(path, messages));
    }

    /// Entries at `scope` or below it.
    pub fn scoped(&self, scope: &Path) -> ErrorSet {
        self.iter()
            .filter(|(path, _)| is_ancestor_or_equal(scope, path))
            .map(|(path, messages)| (path.clone(), messages.to_vec()))
            .collect()
    }

    /// Remove entries at `scope` or below it.
    pub fn clear_scope(&mut self, scope: &Path) {
        self.entries.retain(|path, _| !is_ancestor_or_equal(scope, path));
    }

    /// Rewrite every path through `f`, dropping entries it maps to `None`.
    pub fn remap(&self, mut f: impl FnMut(&Path) -> Option<Path>) -> ErrorSet {
        let mut out = ErrorSet::new();
        for (path, messages) in &self.entries {
            if let Some(path) = f(path) {
                out.extend_path(path, messages.iter().cloned());
            }
        }
        out
    }

    /// Decode `{"path": ["message", ...]}`. A bare string counts as one message;
    /// keys that are not valid field names are reported on the root path.
    pub fn from_json(value: &JsonValue) -> ErrorSet {
        let mut out = ErrorSet::new();
        let Some(map) = value.as_object() else {
            return out;
        };
        for (key, messages) in map {
            let path = form_path::parse(key).unwrap_or_default();
            match messages {
                JsonValue::String(message) => out.push(path, message.clone()),
                JsonValue::Array(items) => out.extend_path(
                    path,
                    items.iter().filter_map(|item| item.as_str().map(str::to_string)),
                ),
                _ => {}
            }
        }
        out
    }

    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .entries
            .iter()
            .map(|(path, messages)| {
                let messages = messages.iter().cloned().map(JsonValue::String).collect();
                (path.to_string(), JsonValue::Array(messages))
            })
            .collect();
        JsonValue::Object(map)
    }
}

impl FromIterator<(Path, Vec<String>)> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = (Path, Vec<String>)>>(iter: I) -> Self {
        let mut out = ErrorSet::new();
        for (path, messages) in iter {
            out.extend_path(path, messages);
        }
        out
    }
}

impl Extend<(Path, Vec<String>)> for ErrorSet {
    fn extend<I: IntoIterator<Item = (Path, Vec<String>)>>(&mut self, iter: I) {
        for (path, messages) in iter {
            self.extend_path(path, messages);
        }
    }
}

impl<'a> IntoIterator for &'a ErrorSet {
    type Item = (&'a Path, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, Path, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
