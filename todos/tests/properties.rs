//! Property-based tests for the todo store's algebraic guarantees.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todos::{FilterMode, TodoEnvironment, TodoStore};
use unistore_testing::{test_clock, test_ids};

fn test_store() -> TodoStore {
    let env = TodoEnvironment::new(Arc::new(test_clock()), Arc::new(test_ids()));
    TodoStore::new(env)
}

/// A store populated from a list of (text, completed) pairs
fn populated(entries: &[(String, bool)]) -> TodoStore {
    let store = test_store();
    for (text, completed) in entries {
        if let Some(id) = store.add(text) {
            if *completed {
                store.toggle(&id);
            }
        }
    }
    store
}

fn entry_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(("[ a-z]{0,12}", any::<bool>()), 0..32)
}

proptest! {
    #[test]
    fn total_counts_nonblank_adds(entries in entry_strategy()) {
        let store = test_store();
        let mut accepted: usize = 0;
        for (text, _) in &entries {
            if store.add(text).is_some() {
                accepted += 1;
                prop_assert!(!text.trim().is_empty());
            }
        }
        prop_assert_eq!(store.stats().total, accepted);
    }

    #[test]
    fn active_and_completed_partition_the_list(entries in entry_strategy()) {
        let store = populated(&entries);
        let state = store.snapshot();

        let active: HashSet<_> = state
            .todos_matching(FilterMode::Active)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let completed: HashSet<_> = state
            .todos_matching(FilterMode::Completed)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let all: HashSet<_> = state
            .todos_matching(FilterMode::All)
            .iter()
            .map(|t| t.id.clone())
            .collect();

        prop_assert!(active.is_disjoint(&completed));
        let union: HashSet<_> = active.union(&completed).cloned().collect();
        prop_assert_eq!(union, all);
        prop_assert_eq!(state.todos.len(), state.stats().total);
    }

    #[test]
    fn double_toggle_is_identity(entries in entry_strategy(), pick in any::<prop::sample::Index>()) {
        let store = populated(&entries);
        let state = store.snapshot();
        prop_assume!(!state.todos.is_empty());

        let id = state.todos[pick.index(state.todos.len())].id.clone();
        store.toggle(&id);
        store.toggle(&id);

        prop_assert_eq!(store.snapshot(), state);
    }

    #[test]
    fn clear_completed_is_idempotent(entries in entry_strategy()) {
        let store = populated(&entries);

        store.clear_completed();
        let once = store.snapshot();
        store.clear_completed();

        prop_assert_eq!(store.snapshot(), once.clone());
        prop_assert_eq!(once.stats().completed, 0);
    }

    #[test]
    fn remove_decreases_total_by_at_most_one(entries in entry_strategy(), pick in any::<prop::sample::Index>()) {
        let store = populated(&entries);
        let state = store.snapshot();
        prop_assume!(!state.todos.is_empty());

        let id = state.todos[pick.index(state.todos.len())].id.clone();
        let before = store.stats().total;
        store.remove(&id);
        store.remove(&id);

        prop_assert_eq!(store.stats().total, before - 1);
    }

    #[test]
    fn insertion_order_survives_toggles(entries in entry_strategy()) {
        let store = populated(&entries);
        let order_before: Vec<_> = store.snapshot().todos.iter().map(|t| t.id.clone()).collect();

        for id in &order_before {
            store.toggle(id);
        }

        let order_after: Vec<_> = store.snapshot().todos.iter().map(|t| t.id.clone()).collect();
        prop_assert_eq!(order_before, order_after);
    }
}
