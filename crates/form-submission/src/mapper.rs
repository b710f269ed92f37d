//! Reconciles validator output and previous errors with the mutated tree.
//!
//! Errors addressed into a list follow the same index rewriting the list
//! went through: an error on `tasks[2].name` becomes `tasks[3].name` after
//! an insert at index 2 and disappears when `tasks[2]` is removed.

use form_path::{is_ancestor_or_equal, reorder_in_list, shift_in_list, Path};

use crate::errors::ErrorSet;
use crate::intent::Intent;
use crate::mutate::ListEdit;

// ── Path rebasing ─────────────────────────────────────────────────────────

/// Re-address `path` after `edit` was applied. `None` means the node is gone.
///
/// # Example
///
/// ```
/// use form_submission::{rebase_path, ListEdit};
///
/// let edit = ListEdit::Insert { list: "tasks".parse().unwrap(), index: 0 };
/// let moved = rebase_path(&edit, &"tasks[1].name".parse().unwrap()).unwrap();
/// assert_eq!(moved.to_string(), "tasks[2].name");
/// ```
pub fn rebase_path(edit: &ListEdit, path: &Path) -> Option<Path> {
    match edit {
        ListEdit::Insert { list, index } => shift_in_list(list, path, *index, 1),
        ListEdit::Remove { list, index } => shift_in_list(list, path, *index, -1),
        ListEdit::Reorder { list, from, to } => Some(reorder_in_list(list, path, *from, *to)),
        // The element was overwritten: whatever was said about it no longer applies.
        ListEdit::Replace { list, index } => {
            if is_ancestor_or_equal(&list.join(*index), path) {
                None
            } else {
                Some(path.clone())
            }
        }
    }
}

/// Re-address every entry of `errors` through `edit`, dropping removed ones.
pub fn rebase_errors(errors: &ErrorSet, edit: &ListEdit) -> ErrorSet {
    errors.remap(|path| rebase_path(edit, path))
}

// ── Merging ───────────────────────────────────────────────────────────────

/// Compute the error set of a submission.
///
/// - `Submit` and whole-form `Validate`: `raw` replaces `previous`.
/// - `Validate(p)`: only entries at or below `p` are replaced.
/// - List intents: `previous` is rebased through `edit`; when the validator
///   was re-run its entries replace the edited list's subtree.
///
/// Form-level entries (root path) in `raw` are always carried over. A
/// missing `raw` means the validator did not run and changes nothing.
pub fn map_errors(
    intent: &Intent,
    edit: Option<&ListEdit>,
    raw: Option<&ErrorSet>,
    previous: Option<&ErrorSet>,
) -> ErrorSet {
    let previous = previous.cloned().unwrap_or_default();
    match intent {
        Intent::Submit | Intent::Validate { path: None } => match raw {
            Some(raw) => raw.clone(),
            None => previous,
        },
        Intent::Validate { path: Some(scope) } => merge_scoped(previous, raw, scope),
        Intent::ListInsert { path: list, .. }
        | Intent::ListRemove { path: list, .. }
        | Intent::ListReorder { path: list, .. }
        | Intent::ListReplace { path: list, .. } => {
            let rebased = match edit {
                Some(edit) => rebase_errors(&previous, edit),
                None => previous,
            };
            merge_scoped(rebased, raw, list)
        }
    }
}

fn merge_scoped(mut base: ErrorSet, raw: Option<&ErrorSet>, scope: &Path) -> ErrorSet {
    let Some(raw) = raw else {
        return base;
    };
    base.clear_scope(scope);
    base.extend(
        raw.iter()
            .filter(|(path, _)| is_ancestor_or_equal(scope, path))
            .map(|(path, messages)| (path.clone(), messages.to_vec())),
    );
    if !scope.is_root() {
        if let Some(form_level) = raw.get(&Path::root()) {
            base.retain(|path, _| !path.is_root());
            base.extend_path(Path::root(), form_level.iter().cloned());
        }
    }
    base
}
