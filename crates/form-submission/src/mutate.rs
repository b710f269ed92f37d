//! Structural edits requested by list intents.
//!
//! Every index is checked against the list before anything moves: inserts
//! clamp to `[0, len]`, removes, reorders and replaces outside
//! `[0, len - 1]` are no-ops. Stale clients (a double click racing a
//! re-render) therefore never fail a submission.

use form_path::{Path, Segment};

use crate::intent::Intent;
use crate::value::{empty_like, Value};

/// The list edit that was actually applied, with clamped indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEdit {
    Insert { list: Path, index: usize },
    Remove { list: Path, index: usize },
    Reorder { list: Path, from: usize, to: usize },
    Replace { list: Path, index: usize },
}

impl ListEdit {
    pub fn list(&self) -> &Path {
        match self {
            ListEdit::Insert { list, .. }
            | ListEdit::Remove { list, .. }
            | ListEdit::Reorder { list, .. }
            | ListEdit::Replace { list, .. } => list,
        }
    }
}

/// The tree after an intent, and the edit that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub tree: Value,
    /// `None` when nothing moved.
    pub edit: Option<ListEdit>,
}

/// Apply `intent` to a copy of `tree`.
///
/// # Example
///
/// ```
/// use form_submission::{apply_intent, Intent, Value};
/// use serde_json::json;
///
/// let tree = Value::from(json!({"tasks": ["a", "b", "c"]}));
/// let out = apply_intent(&tree, &Intent::remove("tasks".parse().unwrap(), 0));
/// assert_eq!(serde_json::Value::from(&out.tree), json!({"tasks": ["b", "c"]}));
/// ```
pub fn apply_intent(tree: &Value, intent: &Intent) -> Mutation {
    let mut tree = tree.clone();
    let edit = apply_intent_mut(&mut tree, intent);
    Mutation { tree, edit }
}

/// Apply `intent` in place. Returns the applied edit, or `None` for a no-op.
pub fn apply_intent_mut(tree: &mut Value, intent: &Intent) -> Option<ListEdit> {
    let edit = match intent {
        Intent::Submit | Intent::Validate { .. } => return None,
        Intent::ListInsert {
            path,
            index,
            default_value,
        } => apply_insert(tree, path, *index, default_value.as_ref()),
        Intent::ListRemove { path, index } => apply_remove(tree, path, *index),
        Intent::ListReorder { path, from, to } => apply_reorder(tree, path, *from, *to),
        Intent::ListReplace { path, index, value } => apply_replace(tree, path, *index, value.as_ref()),
    };
    if edit.is_none() {
        tracing::debug!(intent = %intent, "list intent did not change the tree");
    }
    edit
}

// ── Individual edits ──────────────────────────────────────────────────────

fn apply_insert(
    tree: &mut Value,
    path: &Path,
    index: Option<usize>,
    default_value: Option<&Value>,
) -> Option<ListEdit> {
    if !creatable(tree, path) {
        return None;
    }
    let node = ensure_node(tree, path)?;
    let items = promote(node)?;
    let at = index.map_or(items.len(), |i| i.min(items.len()));
    let value = match default_value {
        Some(value) => value.clone(),
        None => blank_element(items),
    };
    items.insert(at, value);
    Some(ListEdit::Insert {
        list: path.clone(),
        index: at,
    })
}

fn apply_remove(tree: &mut Value, path: &Path, index: usize) -> Option<ListEdit> {
    let node = tree.get_mut(path)?;
    if index >= list_len(node)? {
        return None;
    }
    let items = promote(node)?;
    items.remove(index);
    Some(ListEdit::Remove {
        list: path.clone(),
        index,
    })
}

fn apply_reorder(tree: &mut Value, path: &Path, from: usize, to: usize) -> Option<ListEdit> {
    let node = tree.get_mut(path)?;
    let len = list_len(node)?;
    if from == to || from >= len || to >= len {
        return None;
    }
    let items = promote(node)?;
    let moved = items.remove(from);
    items.insert(to, moved);
    Some(ListEdit::Reorder {
        list: path.clone(),
        from,
        to,
    })
}

fn apply_replace(tree: &mut Value, path: &Path, index: usize, value: Option<&Value>) -> Option<ListEdit> {
    let node = tree.get_mut(path)?;
    if index >= list_len(node)? {
        return None;
    }
    let items = promote(node)?;
    let slot = items.get_mut(index)?;
    *slot = match value {
        Some(value) => value.clone(),
        None => empty_like(slot),
    };
    Some(ListEdit::Replace {
        list: path.clone(),
        index,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Length of the node seen as a list. A lone scalar is a one-element list.
fn list_len(node: &Value) -> Option<usize> {
    match node {
        Value::Null => Some(0),
        Value::Scalar(_) => Some(1),
        Value::List(items) => Some(items.len()),
        Value::Object(_) => None,
    }
}

fn promote(node: &mut Value) -> Option<&mut Vec<Value>> {
    match node {
        Value::Null => *node = Value::List(Vec::new()),
        Value::Scalar(_) => {
            let first = std::mem::replace(node, Value::Null);
            *node = Value::List(vec![first]);
        }
        Value::List(_) | Value::Object(_) => {}
    }
    match node {
        Value::List(items) => Some(items),
        _ => None,
    }
}

/// Blank element shaped like the first populated sibling.
fn blank_element(items: &[Value]) -> Value {
    items
        .iter()
        .find(|item| !item.is_null())
        .map(empty_like)
        .unwrap_or_else(|| Value::text(""))
}

/// True if `path` exists, or can be created by adding object fields only.
fn creatable(tree: &Value, path: &Path) -> bool {
    let mut node = Some(tree);
    for segment in path {
        node = match (node, segment) {
            (None | Some(Value::Null), Segment::Key(_)) => None,
            (Some(Value::Object(fields)), Segment::Key(key)) => fields.get(key),
            (Some(Value::List(items)), Segment::Index(index)) => match items.get(*index) {
                Some(item) => Some(item),
                None => return false,
            },
            _ => return false,
        };
    }
    true
}

fn ensure_node<'a>(tree: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    let mut node = tree;
    for segment in path {
        if node.is_null() && matches!(segment, Segment::Key(_)) {
            *node = Value::empty_object();
        }
        node = match (node, segment) {
            (Value::Object(fields), Segment::Key(key)) => fields.entry(key.clone()).or_insert(Value::Null),
            (Value::List(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(node)
}
