//! Reducer logic for the todo list.
//!
//! Every mutation is expressed as a [`TodoAction`] applied by the
//! [`TodoReducer`]. Rejected input and operations on unknown ids are
//! silent no-ops reported as [`Change::Unchanged`]; an id may have been
//! legitimately removed between the user's intent and the dispatch (a
//! double-click on delete, for instance), so that is never an error.

use crate::types::{FilterMode, Todo, TodoAction, TodoId, TodoState};
use std::sync::Arc;
use unistore_core::{
    environment::{Clock, IdGenerator},
    reducer::{Change, Reducer},
};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for entry timestamps
    pub clock: Arc<dyn Clock>,
    /// Generator for entry ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn add(state: &mut TodoState, env: &TodoEnvironment, id: TodoId, text: &str) -> Change {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("rejected add: empty text");
            return Change::Unchanged;
        }
        if state.exists(&id) {
            // Id reuse would break uniqueness; treat like any other bad input.
            tracing::warn!(%id, "rejected add: id already present");
            return Change::Unchanged;
        }

        state
            .todos
            .push(Todo::new(id, text.to_owned(), env.clock.now()));
        Change::Changed
    }

    fn toggle(state: &mut TodoState, id: &TodoId) -> Change {
        match state.todos.iter_mut().find(|t| &t.id == id) {
            Some(todo) => {
                todo.toggle();
                Change::Changed
            }
            None => {
                tracing::debug!(%id, "toggle on unknown id, ignoring");
                Change::Unchanged
            }
        }
    }

    fn remove(state: &mut TodoState, id: &TodoId) -> Change {
        match state.todos.iter().position(|t| &t.id == id) {
            Some(index) => {
                state.todos.remove(index);
                Change::Changed
            }
            None => {
                tracing::debug!(%id, "remove on unknown id, ignoring");
                Change::Unchanged
            }
        }
    }

    fn set_filter(state: &mut TodoState, filter: FilterMode) -> Change {
        if state.filter == filter {
            return Change::Unchanged;
        }
        state.filter = filter;
        Change::Changed
    }

    fn clear_completed(state: &mut TodoState) -> Change {
        let before = state.todos.len();
        state.todos.retain(|t| !t.completed);
        Change::from(state.todos.len() < before)
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Change {
        match action {
            TodoAction::Add { id, text } => Self::add(state, env, id, &text),
            TodoAction::Toggle { id } => Self::toggle(state, &id),
            TodoAction::Remove { id } => Self::remove(state, &id),
            TodoAction::SetFilter { filter } => Self::set_filter(state, filter),
            TodoAction::ClearCompleted => Self::clear_completed(state),
        }
    }
}
