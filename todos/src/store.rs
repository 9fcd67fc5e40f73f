//! High-level todo store.
//!
//! [`TodoStore`] wraps the generic [`Store`] with the named todo
//! operations and their validation feedback. Mutations return what the
//! caller needs to react to a rejection: `add` hands back the new id or
//! `None`, the rest report whether anything actually changed. Rejected
//! operations never raise errors.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{FilterMode, Todo, TodoAction, TodoId, TodoState, TodoStats};
use std::sync::Arc;
use unistore_core::environment::IdGenerator;
use unistore_runtime::{Store, SubscriberId};

/// Observable todo-list store
///
/// Constructed once at session start and passed by reference (or `Arc`)
/// to everything that edits or renders the list. The store owns its
/// state exclusively: observers and readers only ever see read-only
/// views or clones.
///
/// # Example
///
/// ```ignore
/// let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIds));
/// let store = TodoStore::new(env);
///
/// let id = store.add("Buy milk").expect("non-empty text is accepted");
/// store.toggle(&id);
/// assert_eq!(store.stats().completed, 1);
/// ```
pub struct TodoStore {
    inner: Store<TodoReducer>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoStore {
    /// Creates a store with an empty list and the `All` filter
    #[must_use]
    pub fn new(env: TodoEnvironment) -> Self {
        Self::with_state(TodoState::new(), env)
    }

    /// Creates a store over an existing state, e.g. a seed list
    #[must_use]
    pub fn with_state(state: TodoState, env: TodoEnvironment) -> Self {
        let ids = Arc::clone(&env.ids);
        Self {
            inner: Store::new(state, TodoReducer::new(), env),
            ids,
        }
    }

    /// Appends a new entry and returns its id
    ///
    /// Returns `None` when `text` trims to nothing; the list is left
    /// untouched and nobody is notified.
    pub fn add(&self, text: &str) -> Option<TodoId> {
        let id = TodoId::from_uuid(self.ids.generate());
        let change = self.inner.send(TodoAction::Add {
            id: id.clone(),
            text: text.to_owned(),
        });
        change.is_changed().then_some(id)
    }

    /// Flips completion on the matching entry
    ///
    /// Returns `false` when no entry matches; that is a silent no-op,
    /// not a failure.
    pub fn toggle(&self, id: &TodoId) -> bool {
        self.inner
            .send(TodoAction::Toggle { id: id.clone() })
            .is_changed()
    }

    /// Deletes the matching entry
    ///
    /// Returns `false` when no entry matches.
    pub fn remove(&self, id: &TodoId) -> bool {
        self.inner
            .send(TodoAction::Remove { id: id.clone() })
            .is_changed()
    }

    /// Replaces the view selector
    ///
    /// Returns `false` when the filter is already `filter`; in that case
    /// observers are not re-notified.
    pub fn set_filter(&self, filter: FilterMode) -> bool {
        self.inner.send(TodoAction::SetFilter { filter }).is_changed()
    }

    /// Deletes every completed entry, preserving the order of the rest
    ///
    /// Returns `false` when nothing was completed.
    pub fn clear_completed(&self) -> bool {
        self.inner.send(TodoAction::ClearCompleted).is_changed()
    }

    /// The currently active filter
    #[must_use]
    pub fn filter(&self) -> FilterMode {
        self.inner.state(|s| s.filter)
    }

    /// Entries visible under the current filter, in insertion order
    #[must_use]
    pub fn filtered_todos(&self) -> Vec<Todo> {
        self.inner
            .state(|s| s.filtered_todos().into_iter().cloned().collect())
    }

    /// Aggregate counts over the full list
    #[must_use]
    pub fn stats(&self) -> TodoStats {
        self.inner.state(TodoState::stats)
    }

    /// A clone of the full current state
    #[must_use]
    pub fn snapshot(&self) -> TodoState {
        self.inner.snapshot()
    }

    /// Read current state via a closure, without cloning
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoState) -> T,
    {
        self.inner.state(f)
    }

    /// Registers an observer notified after every state-changing edit
    ///
    /// Observers run synchronously, in registration order, before the
    /// mutating call returns. See [`Store::subscribe`] for the reentrancy
    /// rules.
    pub fn subscribe<F>(&self, observer: F) -> SubscriberId
    where
        F: Fn(&TodoState) + Send + Sync + 'static,
    {
        self.inner.subscribe(observer)
    }

    /// Removes a subscription; `false` when the token was already spent
    pub fn unsubscribe(&self, token: SubscriberId) -> bool {
        self.inner.unsubscribe(token)
    }

    /// Number of currently registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observer_count()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("stats", &self.stats())
            .field("filter", &self.filter())
            .finish_non_exhaustive()
    }
}
