//! Field-name paths for submitted forms.
//!
//! A form control name such as `tasks[2].name` addresses a node in the
//! structured value tree built from the submission. This crate parses and
//! formats those names and provides the path algebra used when list
//! elements are inserted, removed or reordered:
//!
//! - `.` descends into an object field
//! - `[n]` selects a list element
//!
//! # Example
//!
//! ```
//! use form_path::{format, is_ancestor, parse, shift_index, Segment};
//!
//! let path = parse("tasks[2].name").unwrap();
//! assert_eq!(path.segments(), &[Segment::key("tasks"), Segment::Index(2), Segment::key("name")]);
//! assert_eq!(format(&path), "tasks[2].name");
//!
//! let tasks = parse("tasks").unwrap();
//! assert!(is_ancestor(&tasks, &path));
//!
//! // An element was inserted at index 1: everything from 1 on moves down by one.
//! let shifted = shift_index(&path, 1, 1, 1).unwrap();
//! assert_eq!(shifted.to_string(), "tasks[3].name");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, Segment};

pub mod validate;
pub use validate::{
    is_canonical_key, validate_name, validate_path, MAX_LIST_INDEX, MAX_NAME_LENGTH, MAX_PATH_DEPTH,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedPath {
    #[error("empty path segment")]
    EmptySegment,
    #[error("unclosed '['")]
    UnclosedBracket,
    #[error("unexpected bracket")]
    UnexpectedBracket,
    #[error("invalid list index: {0:?}")]
    InvalidIndex(String),
    #[error("unexpected character: {0:?}")]
    UnexpectedChar(char),
    #[error("field name too long")]
    TooLong,
    #[error("path too deep")]
    TooDeep,
    #[error("list index {0} exceeds the limit")]
    IndexTooLarge(usize),
}

// ── Parsing ───────────────────────────────────────────────────────────────

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<Path, MalformedPath> {
        let mut segments = Vec::new();
        if self.input.is_empty() {
            return Ok(Path::root());
        }

        // Top-level list forms start with an index.
        if self.peek() == Some('[') {
            segments.push(self.parse_index()?);
        } else {
            segments.push(self.parse_key()?);
        }

        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.advance();
                    segments.push(self.parse_key()?);
                }
                '[' => segments.push(self.parse_index()?),
                ']' => return Err(MalformedPath::UnexpectedBracket),
                other => return Err(MalformedPath::UnexpectedChar(other)),
            }
        }

        Ok(Path::new(segments))
    }

    fn parse_key(&mut self) -> Result<Segment, MalformedPath> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '.' | '[' | ']') {
                break;
            }
            self.advance();
        }
        if start == self.pos {
            return Err(MalformedPath::EmptySegment);
        }
        Ok(Segment::Key(self.input[start..self.pos].to_string()))
    }

    fn parse_index(&mut self) -> Result<Segment, MalformedPath> {
        // Caller guarantees the current char is '['.
        self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(MalformedPath::UnclosedBracket),
                Some(']') => break,
                Some('[') => return Err(MalformedPath::UnexpectedBracket),
                Some(_) => self.advance(),
            }
        }
        let digits = &self.input[start..self.pos];
        self.advance();
        if !is_valid_index(digits) {
            return Err(MalformedPath::InvalidIndex(digits.to_string()));
        }
        digits
            .parse()
            .map(Segment::Index)
            .map_err(|_| MalformedPath::InvalidIndex(digits.to_string()))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }
}

/// Parse a field name into a [`Path`].
///
/// # Errors
///
/// Returns [`MalformedPath`] if a segment is empty, brackets are unbalanced,
/// an index is not a non-negative integer without leading zeros, or the
/// name exceeds the size limits (including [`MAX_LIST_INDEX`]).
///
/// # Example
///
/// ```
/// use form_path::{parse, MalformedPath, Segment};
///
/// assert_eq!(parse("").unwrap().len(), 0);
/// assert_eq!(parse("[0].title").unwrap().first(), Some(&Segment::Index(0)));
/// assert_eq!(parse("a..b"), Err(MalformedPath::EmptySegment));
/// assert_eq!(parse("a[1"), Err(MalformedPath::UnclosedBracket));
/// assert!(matches!(parse("a[-1]"), Err(MalformedPath::InvalidIndex(_))));
/// ```
pub fn parse(raw: &str) -> Result<Path, MalformedPath> {
    validate_name(raw)?;
    let path = PathParser::new(raw).parse()?;
    validate_path(&path)?;
    Ok(path)
}

/// Format a path as a field name. Left inverse of [`parse`] for canonical paths.
pub fn format(path: &Path) -> String {
    path.to_string()
}

/// Check if a string is a list index as written in a field name.
///
/// # Example
///
/// ```
/// use form_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("12"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Returns true if the path survives a format/parse round trip.
pub fn is_canonical(path: &Path) -> bool {
    path.len() <= MAX_PATH_DEPTH
        && path.iter().all(|segment| match segment {
            Segment::Key(key) => is_canonical_key(key),
            Segment::Index(index) => *index <= MAX_LIST_INDEX,
        })
}

// ── Comparison ────────────────────────────────────────────────────────────

/// Check if `a` is a strict ancestor of `b`.
///
/// # Example
///
/// ```
/// use form_path::{is_ancestor, parse};
///
/// let tasks = parse("tasks").unwrap();
/// let name = parse("tasks[0].name").unwrap();
/// assert!(is_ancestor(&tasks, &name));
/// assert!(!is_ancestor(&name, &tasks));
/// assert!(!is_ancestor(&tasks, &tasks));
/// ```
pub fn is_ancestor(a: &Path, b: &Path) -> bool {
    a.len() < b.len() && b.segments().starts_with(a.segments())
}

/// Check if `a` equals `b` or is one of its ancestors.
pub fn is_ancestor_or_equal(a: &Path, b: &Path) -> bool {
    b.segments().starts_with(a.segments())
}

/// Get the parent path, or `None` for the root.
pub fn parent(path: &Path) -> Option<Path> {
    let (_, init) = path.segments().split_last()?;
    Some(Path::new(init.to_vec()))
}

// ── Index rewriting ───────────────────────────────────────────────────────

/// Rewrite the list index at `depth` by `delta`.
///
/// Indices before `from` are untouched. A positive `delta` describes
/// elements inserted at `from`; a negative `delta` describes elements
/// removed starting at `from`, and paths pointing into one of the removed
/// positions return `None`. Paths that are too short, or that hold a key at
/// `depth`, are returned unchanged.
///
/// # Example
///
/// ```
/// use form_path::{parse, shift_index};
///
/// let path = parse("tasks[2].name").unwrap();
/// assert_eq!(shift_index(&path, 1, 0, 1).unwrap().to_string(), "tasks[3].name");
/// assert_eq!(shift_index(&path, 1, 1, -1).unwrap().to_string(), "tasks[1].name");
/// assert_eq!(shift_index(&path, 1, 2, -1), None);
/// assert_eq!(shift_index(&path, 1, 3, 1).unwrap(), path);
/// ```
pub fn shift_index(path: &Path, depth: usize, from: usize, delta: isize) -> Option<Path> {
    let Some(Segment::Index(index)) = path.get(depth) else {
        return Some(path.clone());
    };
    let index = *index;
    if index < from {
        return Some(path.clone());
    }
    let shifted = if delta >= 0 {
        index.checked_add(delta.unsigned_abs())?
    } else {
        let removed = delta.unsigned_abs();
        if index - from < removed {
            return None;
        }
        index.checked_sub(removed)?
    };
    let mut out = path.clone();
    out.set(depth, Segment::Index(shifted));
    Some(out)
}

/// Rewrite the list index at `depth` as if the element at `from` was removed
/// and reinserted at `to`.
///
/// # Example
///
/// ```
/// use form_path::{parse, reorder_index};
///
/// let moved = parse("tasks[0].name").unwrap();
/// assert_eq!(reorder_index(&moved, 1, 0, 2).to_string(), "tasks[2].name");
///
/// let sibling = parse("tasks[2].name").unwrap();
/// assert_eq!(reorder_index(&sibling, 1, 0, 2).to_string(), "tasks[1].name");
/// ```
pub fn reorder_index(path: &Path, depth: usize, from: usize, to: usize) -> Path {
    let Some(Segment::Index(index)) = path.get(depth) else {
        return path.clone();
    };
    let index = *index;
    let moved = if index == from {
        to
    } else if from < to && index > from && index <= to {
        index - 1
    } else if to < from && index >= to && index < from {
        index + 1
    } else {
        index
    };
    let mut out = path.clone();
    out.set(depth, Segment::Index(moved));
    out
}

/// [`shift_index`] applied to the elements of the list at `list`.
///
/// Paths outside `list` come back unchanged.
pub fn shift_in_list(list: &Path, path: &Path, from: usize, delta: isize) -> Option<Path> {
    if !is_ancestor(list, path) {
        return Some(path.clone());
    }
    shift_index(path, list.len(), from, delta)
}

/// [`reorder_index`] applied to the elements of the list at `list`.
pub fn reorder_in_list(list: &Path, path: &Path, from: usize, to: usize) -> Path {
    if !is_ancestor(list, path) {
        return path.clone();
    }
    reorder_index(path, list.len(), from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> Path {
        parse(raw).unwrap()
    }

    #[test]
    fn test_parse_nested() {
        assert_eq!(
            p("a.b[10].c").into_segments(),
            vec![Segment::key("a"), Segment::key("b"), Segment::Index(10), Segment::key("c")]
        );
    }

    #[test]
    fn test_parse_consecutive_indices() {
        assert_eq!(p("grid[1][2]").into_segments(), vec![Segment::key("grid"), Segment::Index(1), Segment::Index(2)]);
    }

    #[test]
    fn test_parse_numeric_key_after_dot_is_a_key() {
        assert_eq!(p("a.0").into_segments(), vec![Segment::key("a"), Segment::key("0")]);
    }

    #[test]
    fn test_parse_unicode_key() {
        assert_eq!(p("café.prix").to_string(), "café.prix");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(".a"), Err(MalformedPath::EmptySegment));
        assert_eq!(parse("a."), Err(MalformedPath::EmptySegment));
        assert_eq!(parse("a]"), Err(MalformedPath::UnexpectedBracket));
        assert_eq!(parse("a[[0]]"), Err(MalformedPath::UnexpectedBracket));
        assert_eq!(parse("a[0]b"), Err(MalformedPath::UnexpectedChar('b')));
        assert_eq!(parse("a[]"), Err(MalformedPath::InvalidIndex(String::new())));
        assert_eq!(parse("a[01]"), Err(MalformedPath::InvalidIndex("01".into())));
        assert_eq!(parse("a[x]"), Err(MalformedPath::InvalidIndex("x".into())));
    }

    #[test]
    fn test_parse_index_overflow() {
        assert!(matches!(parse("a[99999999999999999999999]"), Err(MalformedPath::InvalidIndex(_))));
        let max = format!("a[{}]", usize::MAX);
        assert_eq!(parse(&max), Err(MalformedPath::IndexTooLarge(usize::MAX)));
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent(&p("a.b")), Some(p("a")));
        assert_eq!(parent(&p("a")), Some(Path::root()));
        assert_eq!(parent(&Path::root()), None);
    }

    #[test]
    fn test_ancestor_or_equal() {
        assert!(is_ancestor_or_equal(&p("a"), &p("a")));
        assert!(is_ancestor_or_equal(&Path::root(), &p("a")));
        assert!(!is_ancestor_or_equal(&p("ab"), &p("a")));
    }

    #[test]
    fn test_ancestor_is_segment_wise() {
        assert!(!is_ancestor(&p("task"), &p("tasks[0]")));
    }

    #[test]
    fn test_shift_ignores_key_at_depth() {
        let path = p("tasks.meta");
        assert_eq!(shift_index(&path, 1, 0, 1), Some(path.clone()));
        assert_eq!(shift_index(&path, 5, 0, -1), Some(path));
    }

    #[test]
    fn test_shift_removed_range() {
        let path = p("tasks[3]");
        assert_eq!(shift_index(&path, 1, 2, -2), None);
        assert_eq!(shift_index(&p("tasks[4]"), 1, 2, -2), Some(p("tasks[2]")));
    }

    #[test]
    fn test_shift_outside_list_is_untouched() {
        let list = p("tasks");
        assert_eq!(shift_in_list(&list, &p("other[3]"), 0, 1), Some(p("other[3]")));
        assert_eq!(shift_in_list(&list, &p("tasks[3]"), 0, 1), Some(p("tasks[4]")));
        // The list itself is not one of its elements.
        assert_eq!(shift_in_list(&list, &list, 0, -1), Some(list.clone()));
    }

    #[test]
    fn test_reorder_backwards() {
        // Move [3] to [1]: [1] and [2] move down by one.
        assert_eq!(reorder_index(&p("l[3]"), 1, 3, 1), p("l[1]"));
        assert_eq!(reorder_index(&p("l[1]"), 1, 3, 1), p("l[2]"));
        assert_eq!(reorder_index(&p("l[2]"), 1, 3, 1), p("l[3]"));
        assert_eq!(reorder_index(&p("l[0]"), 1, 3, 1), p("l[0]"));
        assert_eq!(reorder_index(&p("l[4]"), 1, 3, 1), p("l[4]"));
    }

    #[test]
    fn test_reorder_nested_list() {
        let list = p("sections[0].items");
        assert_eq!(
            reorder_in_list(&list, &p("sections[0].items[0].label"), 0, 1),
            p("sections[0].items[1].label")
        );
        assert_eq!(
            reorder_in_list(&list, &p("sections[1].items[0].label"), 0, 1),
            p("sections[1].items[0].label")
        );
    }

    #[test]
    fn test_canonical() {
        assert!(is_canonical(&p("a[0].b")));
        assert!(!is_canonical(&Path::new(vec![Segment::key("a.b")])));
        assert!(!is_canonical(&Path::new(vec![Segment::key("")])));
        assert!(!is_canonical(&Path::new(vec![Segment::key("a,b")])));
        assert!(!is_canonical(&Path::new(vec![Segment::key("l"), Segment::Index(MAX_LIST_INDEX + 1)])));
    }
}
