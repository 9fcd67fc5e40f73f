//! # Unistore Core
//!
//! Core traits and types for the Unistore state container.
//!
//! This crate provides the fundamental abstractions for building small
//! observable state containers using the Reducer pattern with synchronous,
//! single-owner semantics.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, exclusively owned by a store
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → Change`
//! - **Change**: Whether the reducer mutated state (drives observer fan-out)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - All mutation goes through the reducer
//! - Dependency Injection via Environment
//! - No hidden I/O: reducers never suspend, block, or perform side effects
//!
//! ## Example
//!
//! ```ignore
//! use unistore_core::{reducer::Reducer, Change};
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = i64;
//!     type Action = Step;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut i64, action: Step, _env: &()) -> Change {
//!         match action {
//!             Step::Up => *state += 1,
//!             Step::Down => *state -= 1,
//!         }
//!         Change::Changed
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → Change`.
///
/// They contain all business logic, run to completion on the calling
/// thread, and are deterministic given their environment.
pub mod reducer {
    /// Outcome of a single reducer invocation.
    ///
    /// Reducers report whether they mutated state. The store uses this to
    /// decide whether observers need to be notified: an invocation that
    /// left state untouched (rejected input, unknown id, redundant update)
    /// produces no fan-out.
    #[must_use]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Change {
        /// State was mutated; observers must see the new state.
        Changed,
        /// State is byte-for-byte what it was before the action.
        Unchanged,
    }

    impl Change {
        /// Returns `true` if state was mutated
        #[must_use]
        pub const fn is_changed(self) -> bool {
            matches!(self, Self::Changed)
        }

        /// Returns `true` if state was left untouched
        #[must_use]
        pub const fn is_unchanged(self) -> bool {
            matches!(self, Self::Unchanged)
        }

        /// Combine two outcomes: changed if either side changed
        #[must_use]
        pub const fn or(self, other: Self) -> Self {
            match (self, other) {
                (Self::Unchanged, Self::Unchanged) => Self::Unchanged,
                _ => Self::Changed,
            }
        }
    }

    impl From<bool> for Change {
        fn from(changed: bool) -> Self {
            if changed { Self::Changed } else { Self::Unchanged }
        }
    }

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = TodoState;
    ///     type Action = TodoAction;
    ///     type Environment = TodoEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut TodoState,
    ///         action: TodoAction,
    ///         env: &TodoEnvironment,
    ///     ) -> Change {
    ///         match action {
    ///             TodoAction::Toggle { id } => { /* ... */ Change::Changed }
    ///             _ => Change::Unchanged,
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Reports whether state was mutated
        ///
        /// Invalid input (and operations against ids that no longer exist)
        /// must be a silent no-op reported as [`Change::Unchanged`], never
        /// a panic or an error.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Change;
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. Production implementations talk to the
/// real world; deterministic implementations make tests reproducible.
pub mod environment {
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock pinned to the given instant
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Create a clock pinned to the Unix epoch
        #[must_use]
        pub fn epoch() -> Self {
            Self {
                time: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Id generation trait - abstracts entity id creation
    ///
    /// Ids must be unique within a session. Clock-derived ids can collide
    /// when two generations land in the same tick, so implementations are
    /// either collision-resistant random values or strictly monotonic
    /// counters - never raw timestamps.
    pub trait IdGenerator: Send + Sync {
        /// Generate a fresh id, unique within this generator's session
        fn generate(&self) -> Uuid;
    }

    /// Production generator producing random v4 UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIds;

    impl IdGenerator for RandomIds {
        fn generate(&self) -> Uuid {
            Uuid::new_v4()
        }
    }

    /// Strictly monotonic generator for deterministic tests
    ///
    /// Produces `Uuid::from_u128(1)`, `from_u128(2)`, ... in generation
    /// order. Safe to share across threads.
    #[derive(Debug, Default)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Create a generator starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIds {
        fn generate(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

pub use environment::{Clock, FixedClock, IdGenerator, RandomIds, SequentialIds, SystemClock};
pub use reducer::{Change, Reducer};

#[cfg(test)]
mod tests {
    use super::environment::{
        Clock, FixedClock, IdGenerator, RandomIds, SequentialIds, SystemClock,
    };
    use super::reducer::Change;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn change_predicates() {
        assert!(Change::Changed.is_changed());
        assert!(!Change::Changed.is_unchanged());
        assert!(Change::Unchanged.is_unchanged());
        assert!(!Change::Unchanged.is_changed());
    }

    #[test]
    fn change_or_combines() {
        assert_eq!(Change::Unchanged.or(Change::Unchanged), Change::Unchanged);
        assert_eq!(Change::Changed.or(Change::Unchanged), Change::Changed);
        assert_eq!(Change::Unchanged.or(Change::Changed), Change::Changed);
        assert_eq!(Change::Changed.or(Change::Changed), Change::Changed);
    }

    #[test]
    fn change_from_bool() {
        assert_eq!(Change::from(true), Change::Changed);
        assert_eq!(Change::from(false), Change::Unchanged);
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single();
        let instant = instant.unwrap_or_default();
        let clock = FixedClock::new(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_advances_monotonically_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn sequential_ids_are_monotonic_and_unique() {
        let ids = SequentialIds::new();
        let a = ids.generate();
        let b = ids.generate();
        let c = ids.generate();
        assert_eq!(a, Uuid::from_u128(1));
        assert_eq!(b, Uuid::from_u128(2));
        assert_eq!(c, Uuid::from_u128(3));
    }

    #[test]
    fn random_ids_do_not_repeat_back_to_back() {
        let ids = RandomIds;
        assert_ne!(ids.generate(), ids.generate());
    }
}
