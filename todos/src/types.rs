//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of entries plus a view selector.
//! Insertion order is an invariant: toggling completion or changing the
//! filter never reorders the sequence, and derived views preserve it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a todo entry
///
/// Ids are opaque, unique within a session, and immutable after creation.
/// They come from the environment's id generator, never from the wall
/// clock.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// What needs doing; never empty or whitespace-only
    pub text: String,
    /// Whether the entry is done
    pub completed: bool,
    /// When the entry was added
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, not-yet-completed todo
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// View selector over the todo list
///
/// Selects which entries are visible; it does not affect storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every entry
    #[default]
    All,
    /// Entries not yet completed
    Active,
    /// Completed entries
    Completed,
}

impl FilterMode {
    /// Whether `todo` is visible under this filter
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Stable lowercase name, matching the serialized form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a filter name fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter {0:?}, expected one of: all, active, completed")]
pub struct ParseFilterError(pub String);

impl std::str::FromStr for FilterMode {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_owned())),
        }
    }
}

/// Aggregate counts over the full todo sequence
///
/// A pure aggregate of current state; `total == active + completed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    /// Number of entries
    pub total: usize,
    /// Entries not yet completed
    pub active: usize,
    /// Completed entries
    pub completed: usize,
}

/// State of the todo list
///
/// Entries are kept in insertion order with unique ids. The filter is
/// part of state but only affects derived views, never storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All entries, oldest first
    pub todos: Vec<Todo>,
    /// Currently active view selector
    pub filter: FilterMode,
}

impl TodoState {
    /// Creates a new empty todo state with the `All` filter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: FilterMode::All,
        }
    }

    /// Creates a state holding the given entries, `All` filter
    #[must_use]
    pub const fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            filter: FilterMode::All,
        }
    }

    /// Returns the number of entries
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the entry with the given id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Checks whether an entry with the given id exists
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Entries visible under the current filter, in insertion order
    ///
    /// Recomputed on demand from current state; O(n) and never cached.
    #[must_use]
    pub fn filtered_todos(&self) -> Vec<&Todo> {
        self.todos_matching(self.filter)
    }

    /// Entries visible under an explicit filter, in insertion order
    #[must_use]
    pub fn todos_matching(&self, filter: FilterMode) -> Vec<&Todo> {
        self.todos.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Aggregate counts over the full sequence, ignoring the filter
    #[must_use]
    pub fn stats(&self) -> TodoStats {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        TodoStats {
            total,
            active: total - completed,
            completed,
        }
    }
}

/// Actions describing every possible edit to the todo list
///
/// Actions are plain values; applying one is the reducer's job. `Add`
/// carries its id so the caller learns the identity of the entry it
/// created (ids come from the environment's generator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new entry with the given id and text
    Add {
        /// Identity of the new entry
        id: TodoId,
        /// Entry text; rejected when blank after trimming
        text: String,
    },
    /// Flip completion on the matching entry
    Toggle {
        /// Entry to toggle
        id: TodoId,
    },
    /// Delete the matching entry
    Remove {
        /// Entry to delete
        id: TodoId,
    },
    /// Replace the view selector
    SetFilter {
        /// The new filter
        filter: FilterMode,
    },
    /// Delete every completed entry, keeping the rest in order
    ClearCompleted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn todo(n: u128, text: &str, completed: bool) -> Todo {
        let mut todo = Todo::new(
            TodoId::from_uuid(Uuid::from_u128(n)),
            text.to_owned(),
            Utc::now(),
        );
        todo.completed = completed;
        todo
    }

    #[test]
    fn todo_id_display_is_uuid() {
        let id = TodoId::from_uuid(Uuid::from_u128(7));
        assert_eq!(format!("{id}"), Uuid::from_u128(7).to_string());
    }

    #[test]
    fn new_todo_starts_active() {
        let item = Todo::new(TodoId::new(), "Buy milk".to_owned(), Utc::now());
        assert!(!item.completed);
        assert_eq!(item.text, "Buy milk");
    }

    #[test]
    fn toggle_flips_completion() {
        let mut item = todo(1, "Buy milk", false);
        item.toggle();
        assert!(item.completed);
        item.toggle();
        assert!(!item.completed);
    }

    #[test]
    fn filter_matches_by_completion() {
        let active = todo(1, "A", false);
        let done = todo(2, "B", true);

        assert!(FilterMode::All.matches(&active));
        assert!(FilterMode::All.matches(&done));
        assert!(FilterMode::Active.matches(&active));
        assert!(!FilterMode::Active.matches(&done));
        assert!(!FilterMode::Completed.matches(&active));
        assert!(FilterMode::Completed.matches(&done));
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!(FilterMode::from_str("all"), Ok(FilterMode::All));
        assert_eq!(FilterMode::from_str("Active"), Ok(FilterMode::Active));
        assert_eq!(FilterMode::from_str(" COMPLETED "), Ok(FilterMode::Completed));
        assert!(FilterMode::from_str("done").is_err());
    }

    #[test]
    fn filter_round_trips_through_display() {
        for mode in [FilterMode::All, FilterMode::Active, FilterMode::Completed] {
            assert_eq!(FilterMode::from_str(&mode.to_string()), Ok(mode));
        }
    }

    #[test]
    fn stats_partition_total() {
        let state = TodoState::with_todos(vec![
            todo(1, "A", false),
            todo(2, "B", true),
            todo(3, "C", true),
        ]);
        let stats = state.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.completed, 2);
    }

    #[test]
    fn filtered_views_preserve_insertion_order() {
        let state = TodoState::with_todos(vec![
            todo(1, "A", true),
            todo(2, "B", false),
            todo(3, "C", true),
        ]);
        let completed: Vec<&str> = state
            .todos_matching(FilterMode::Completed)
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(completed, vec!["A", "C"]);
    }

    #[test]
    fn lookup_by_id() {
        let state = TodoState::with_todos(vec![todo(1, "A", false)]);
        let id = TodoId::from_uuid(Uuid::from_u128(1));
        let missing = TodoId::from_uuid(Uuid::from_u128(9));

        assert!(state.exists(&id));
        assert_eq!(state.get(&id).map(|t| t.text.as_str()), Some("A"));
        assert!(!state.exists(&missing));
    }

    #[test]
    fn action_serializes_to_json() {
        let action = TodoAction::SetFilter {
            filter: FilterMode::Completed,
        };
        let json = serde_json::to_string(&action).unwrap_or_default();
        assert!(json.contains("SetFilter"));
        assert!(json.contains("completed"));
    }

    #[test]
    fn state_serializes_to_json() {
        let state = TodoState::with_todos(vec![todo(1, "A", false)]);
        let json = serde_json::to_string(&state).unwrap_or_default();
        assert!(json.contains("\"filter\":\"all\""));
        let back: TodoState = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back, state);
    }
}
