//! # Todos
//!
//! An observable todo-list store built on the Unistore architecture.
//!
//! The whole system is one component: a state container holding an
//! ordered todo list and a view filter, exposing the classic operations
//! (add, toggle, remove, filter, clear-completed) plus derived read
//! views (filtered list, counts), and notifying observers synchronously
//! after each mutation.
//!
//! ## Architecture
//!
//! - [`TodoState`] / [`TodoAction`]: domain data and every possible edit
//! - [`TodoReducer`]: pure business logic, `(state, action, env) → change`
//! - [`TodoStore`]: facade over the generic runtime store with named
//!   operations and validation feedback
//! - [`TodoEnvironment`]: injected clock and id generator
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use todos::{FilterMode, TodoEnvironment, TodoStore};
//! use unistore_core::environment::{RandomIds, SystemClock};
//!
//! let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIds));
//! let store = TodoStore::new(env);
//!
//! let id = store.add("Buy milk");
//! assert!(id.is_some());
//!
//! store.set_filter(FilterMode::Active);
//! assert_eq!(store.filtered_todos().len(), 1);
//! assert_eq!(store.stats().active, 1);
//! ```

/// Domain types: entries, ids, filters, state, actions
pub mod types;

/// Business logic: the reducer and its environment
pub mod reducer;

/// The high-level observable store
pub mod store;

pub use reducer::{TodoEnvironment, TodoReducer};
pub use store::TodoStore;
pub use types::{FilterMode, ParseFilterError, Todo, TodoAction, TodoId, TodoState, TodoStats};
pub use unistore_runtime::SubscriberId;

/// Builds the demo seed list: three entries, the second already done
///
/// Sessions start either empty or from this fixed seed; it exists so the
/// demo binary and the scenario tests share one starting point.
#[must_use]
pub fn seed_state(env: &TodoEnvironment) -> TodoState {
    let entry = |text: &str, completed: bool| {
        let mut todo = Todo::new(
            TodoId::from_uuid(env.ids.generate()),
            text.to_owned(),
            env.clock.now(),
        );
        todo.completed = completed;
        todo
    };

    TodoState::with_todos(vec![
        entry("Buy milk", false),
        entry("Write documentation", true),
        entry("Deploy to production", false),
    ])
}
