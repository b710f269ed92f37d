use form_submission::{apply_intent, rebase_errors, ErrorSet, Intent, Path, Value};
use proptest::prelude::*;

fn tasks() -> Path {
    "tasks".parse().unwrap()
}

fn form(items: &[String]) -> Value {
    let list = items.iter().map(|s| Value::text(s.as_str())).collect::<Vec<_>>();
    let mut fields = form_submission::value::Fields::new();
    fields.insert("tasks".to_string(), Value::List(list));
    Value::Object(fields)
}

fn items() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,4}", 1..8)
}

proptest! {
    #[test]
    fn insert_then_remove_restores_tree(items in items(), at in 0usize..10) {
        let tree = form(&items);
        let inserted = apply_intent(&tree, &Intent::insert(tasks(), Some(at)));
        let index = at.min(items.len());
        let restored = apply_intent(&inserted.tree, &Intent::remove(tasks(), index));
        prop_assert_eq!(restored.tree, tree);
    }

    #[test]
    fn remove_twice_matches_remove_once(items in items(), at in 0usize..10) {
        prop_assume!(at + 1 >= items.len());
        let intent = Intent::remove(tasks(), at);
        let once = apply_intent(&form(&items), &intent);
        let twice = apply_intent(&once.tree, &intent);
        prop_assert!(twice.edit.is_none());
        prop_assert_eq!(twice.tree, once.tree);
    }

    #[test]
    fn reorder_is_a_permutation(items in items(), from in 0usize..8, to in 0usize..8) {
        let moved = apply_intent(&form(&items), &Intent::reorder(tasks(), from, to));
        let list = moved.tree.get(&tasks()).and_then(Value::as_list).cloned().unwrap_or_default();
        prop_assert_eq!(list.len(), items.len());
        let mut after: Vec<String> = list.iter().filter_map(Value::as_str).map(str::to_string).collect();
        let mut before = items.clone();
        after.sort();
        before.sort();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn reorder_is_reversible(items in items(), from in 0usize..8, to in 0usize..8) {
        prop_assume!(from < items.len() && to < items.len());
        let tree = form(&items);
        let moved = apply_intent(&tree, &Intent::reorder(tasks(), from, to));
        let back = apply_intent(&moved.tree, &Intent::reorder(tasks(), to, from));
        prop_assert_eq!(back.tree, tree);
    }

    #[test]
    fn out_of_range_edits_are_noops(items in items(), extra in 0usize..4) {
        let tree = form(&items);
        let past = items.len() + extra;
        for intent in [
            Intent::remove(tasks(), past),
            Intent::reorder(tasks(), past, 0),
            Intent::replace(tasks(), past, Value::text("x")),
        ] {
            let out = apply_intent(&tree, &intent);
            prop_assert!(out.edit.is_none());
            prop_assert_eq!(&out.tree, &tree);
        }
    }

    #[test]
    fn reorder_keeps_every_error(items in items(), from in 0usize..8, to in 0usize..8) {
        prop_assume!(from < items.len() && to < items.len());
        let errors: ErrorSet = (0..items.len())
            .map(|i| (tasks().join(i), vec![format!("e{i}")]))
            .collect();
        let edit = apply_intent(&form(&items), &Intent::reorder(tasks(), from, to)).edit;
        let rebased = match edit {
            Some(edit) => rebase_errors(&errors, &edit),
            None => errors.clone(),
        };
        prop_assert_eq!(rebased.len(), errors.len());
        // The element that moved carries its error to its new index.
        prop_assert_eq!(rebased.get(&tasks().join(to)), errors.get(&tasks().join(from)));
    }

    #[test]
    fn remove_drops_exactly_one_error(items in items(), at in 0usize..8) {
        prop_assume!(at < items.len());
        let errors: ErrorSet = (0..items.len())
            .map(|i| (tasks().join(i), vec![format!("e{i}")]))
            .collect();
        let out = apply_intent(&form(&items), &Intent::remove(tasks(), at));
        let edit = out.edit.expect("in-range remove applies");
        let rebased = rebase_errors(&errors, &edit);
        prop_assert_eq!(rebased.len(), errors.len() - 1);
        let removed = format!("e{at}");
        prop_assert!(rebased.iter().all(|(_, messages)| messages.first() != Some(&removed)));
    }
}
