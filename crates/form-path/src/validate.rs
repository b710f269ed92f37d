//! Limits on field names and paths.

use crate::{MalformedPath, Path, Segment};

/// Maximum allowed field name length in bytes.
pub const MAX_NAME_LENGTH: usize = 1024;

/// Maximum allowed path depth.
pub const MAX_PATH_DEPTH: usize = 256;

/// Largest list index a field name may carry. Sparse lists are padded up to
/// the index, so this bounds the size of a tree built from one name.
pub const MAX_LIST_INDEX: usize = 10_000;

/// Validate a raw field name before parsing.
///
/// # Example
///
/// ```
/// use form_path::validate_name;
///
/// validate_name("tasks[0].name").unwrap();
/// validate_name(&"a".repeat(2000)).unwrap_err();
/// ```
pub fn validate_name(name: &str) -> Result<(), MalformedPath> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(MalformedPath::TooLong);
    }
    Ok(())
}

/// Validate a parsed path.
pub fn validate_path(path: &Path) -> Result<(), MalformedPath> {
    if path.len() > MAX_PATH_DEPTH {
        return Err(MalformedPath::TooDeep);
    }
    for segment in path {
        if let Segment::Index(index) = segment {
            if *index > MAX_LIST_INDEX {
                return Err(MalformedPath::IndexTooLarge(*index));
            }
        }
    }
    Ok(())
}

/// Returns true if `key` can be written in a field name or an intent
/// argument and read back as the same key.
///
/// Intent arguments are comma-separated and trimmed, so keys holding a
/// comma or edge whitespace are not canonical.
pub fn is_canonical_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']', ',']) && key.trim() == key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_short_name() {
        assert!(validate_name("email").is_ok());
    }

    #[test]
    fn test_validate_long_name() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(validate_name(&name), Err(MalformedPath::TooLong));
    }

    #[test]
    fn test_validate_deep_path() {
        let path: Path = (0..MAX_PATH_DEPTH + 1).map(Segment::Index).collect();
        assert_eq!(validate_path(&path), Err(MalformedPath::TooDeep));
    }

    #[test]
    fn test_validate_max_depth_path() {
        let path: Path = (0..MAX_PATH_DEPTH).map(Segment::Index).collect();
        assert!(validate_path(&path).is_ok());
    }

    #[test]
    fn test_validate_list_index() {
        let at_limit = Path::new(vec![Segment::key("a"), Segment::Index(MAX_LIST_INDEX)]);
        assert!(validate_path(&at_limit).is_ok());
        let past = Path::new(vec![Segment::key("a"), Segment::Index(MAX_LIST_INDEX + 1)]);
        assert_eq!(validate_path(&past), Err(MalformedPath::IndexTooLarge(MAX_LIST_INDEX + 1)));
    }

    #[test]
    fn test_canonical_key() {
        assert!(is_canonical_key("name"));
        assert!(is_canonical_key("first name"));
        assert!(!is_canonical_key(""));
        assert!(!is_canonical_key("a.b"));
        assert!(!is_canonical_key("a[0]"));
        assert!(!is_canonical_key("a,b"));
        assert!(!is_canonical_key(" x"));
        assert!(!is_canonical_key("x\t"));
    }
}
