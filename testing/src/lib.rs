//! # Unistore Testing
//!
//! Testing utilities and helpers for the Unistore state container.
//!
//! This crate provides:
//! - Deterministic environment helpers (`test_clock`, `test_ids`)
//! - A fluent Given-When-Then harness for reducers
//! - A recording observer for asserting on store notifications
//!
//! ## Example
//!
//! ```ignore
//! use unistore_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::ClearCompleted)
//!     .then_unchanged()
//!     .run();
//! ```

use chrono::{TimeZone, Utc};
use unistore_core::environment::{FixedClock, SequentialIds};

/// Fluent Given-When-Then harness for reducers
pub mod reducer_test {
    #![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

    use unistore_core::reducer::{Change, Reducer};

    /// Type alias for state assertion functions
    type StateAssertion<S> = Box<dyn FnOnce(&S)>;

    /// Fluent API for testing reducers with Given-When-Then syntax
    ///
    /// # Example
    ///
    /// ```ignore
    /// ReducerTest::new(TodoReducer::new())
    ///     .with_env(test_environment())
    ///     .given_state(TodoState::new())
    ///     .when_action(TodoAction::Add { id, text: "Buy milk".into() })
    ///     .then_changed()
    ///     .then_state(|state| assert_eq!(state.count(), 1))
    ///     .run();
    /// ```
    pub struct ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        reducer: R,
        environment: Option<E>,
        initial_state: Option<S>,
        actions: Vec<A>,
        expected_change: Option<Change>,
        state_assertions: Vec<StateAssertion<S>>,
    }

    impl<R, S, A, E> ReducerTest<R, S, A, E>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new reducer test with the given reducer
        #[must_use]
        pub const fn new(reducer: R) -> Self {
            Self {
                reducer,
                environment: None,
                initial_state: None,
                actions: Vec::new(),
                expected_change: None,
                state_assertions: Vec::new(),
            }
        }

        /// Set the environment for the test
        #[must_use]
        pub fn with_env(mut self, env: E) -> Self {
            self.environment = Some(env);
            self
        }

        /// Set the initial state (Given)
        #[must_use]
        pub fn given_state(mut self, state: S) -> Self {
            self.initial_state = Some(state);
            self
        }

        /// Set the action to test (When)
        ///
        /// May be called repeatedly; actions are applied in order and the
        /// change expectation applies to the final action.
        #[must_use]
        pub fn when_action(mut self, action: A) -> Self {
            self.actions.push(action);
            self
        }

        /// Expect the final action to mutate state (Then)
        #[must_use]
        pub fn then_changed(mut self) -> Self {
            self.expected_change = Some(Change::Changed);
            self
        }

        /// Expect the final action to be a silent no-op (Then)
        #[must_use]
        pub fn then_unchanged(mut self) -> Self {
            self.expected_change = Some(Change::Unchanged);
            self
        }

        /// Add an assertion about the resulting state (Then)
        #[must_use]
        pub fn then_state<F>(mut self, assertion: F) -> Self
        where
            F: FnOnce(&S) + 'static,
        {
            self.state_assertions.push(Box::new(assertion));
            self
        }

        /// Run the test and execute all assertions
        ///
        /// # Panics
        ///
        /// Panics if initial state, action, or environment is not set,
        /// or if any assertion fails.
        #[allow(clippy::panic)] // Test code can panic
        #[allow(clippy::expect_used)] // Test code can use expect
        pub fn run(self) {
            let mut state = self
                .initial_state
                .expect("Initial state must be set with given_state()");

            let env = self
                .environment
                .expect("Environment must be set with with_env()");

            assert!(
                !self.actions.is_empty(),
                "At least one action must be set with when_action()"
            );

            let mut last_change = Change::Unchanged;
            for action in self.actions {
                last_change = self.reducer.reduce(&mut state, action, &env);
            }

            if let Some(expected) = self.expected_change {
                assert_eq!(
                    last_change, expected,
                    "Final action reported {last_change:?}, expected {expected:?}"
                );
            }

            for assertion in self.state_assertions {
                assertion(&state);
            }
        }
    }
}

/// Observer that records every notification it receives
pub mod observers {
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records each state snapshot delivered to a store observer
    ///
    /// Register the callback produced by [`RecordingObserver::callback`]
    /// with a store, then assert on the recorded snapshots.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let probe = RecordingObserver::new();
    /// let token = store.subscribe(probe.callback());
    ///
    /// store.send(TodoAction::ClearCompleted);
    /// assert_eq!(probe.len(), 1);
    /// ```
    #[derive(Debug, Default)]
    pub struct RecordingObserver<S> {
        seen: Arc<Mutex<Vec<S>>>,
    }

    impl<S> RecordingObserver<S>
    where
        S: Clone + Send + 'static,
    {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self {
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Produce the callback to register with a store
        #[must_use]
        pub fn callback(&self) -> impl Fn(&S) + Send + Sync + 'static {
            let seen = Arc::clone(&self.seen);
            move |state: &S| {
                seen.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(state.clone());
            }
        }

        /// Number of notifications received so far
        #[must_use]
        pub fn len(&self) -> usize {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether no notification has been received
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// All recorded snapshots, oldest first
        #[must_use]
        pub fn snapshots(&self) -> Vec<S> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// The most recent snapshot, if any
        #[must_use]
        pub fn last(&self) -> Option<S> {
            self.seen
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }
    }
}

/// A clock pinned to 2024-01-15 12:00:00 UTC for deterministic tests
#[must_use]
pub fn test_clock() -> FixedClock {
    let time = Utc
        .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default();
    FixedClock::new(time)
}

/// A strictly monotonic id generator starting at 1
#[must_use]
pub const fn test_ids() -> SequentialIds {
    SequentialIds::new()
}

pub use observers::RecordingObserver;
pub use reducer_test::ReducerTest;

#[cfg(test)]
mod tests {
    use super::*;
    use unistore_core::environment::{Clock, IdGenerator};
    use unistore_core::reducer::{Change, Reducer};
    use unistore_core::Uuid;
    use unistore_runtime::Store;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct TallyState {
        total: u32,
    }

    #[derive(Debug, Clone)]
    enum TallyAction {
        Bump,
        Ignore,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(&self, state: &mut TallyState, action: TallyAction, (): &()) -> Change {
            match action {
                TallyAction::Bump => {
                    state.total += 1;
                    Change::Changed
                }
                TallyAction::Ignore => Change::Unchanged,
            }
        }
    }

    #[test]
    fn test_clock_is_deterministic() {
        assert_eq!(test_clock().now(), test_clock().now());
    }

    #[test]
    fn test_ids_start_at_one() {
        let ids = test_ids();
        assert_eq!(ids.generate(), Uuid::from_u128(1));
        assert_eq!(ids.generate(), Uuid::from_u128(2));
    }

    #[test]
    fn reducer_test_applies_actions_in_order() {
        ReducerTest::new(TallyReducer)
            .with_env(())
            .given_state(TallyState::default())
            .when_action(TallyAction::Bump)
            .when_action(TallyAction::Bump)
            .then_changed()
            .then_state(|state| assert_eq!(state.total, 2))
            .run();
    }

    #[test]
    fn reducer_test_checks_noop_outcome() {
        ReducerTest::new(TallyReducer)
            .with_env(())
            .given_state(TallyState::default())
            .when_action(TallyAction::Ignore)
            .then_unchanged()
            .then_state(|state| assert_eq!(state.total, 0))
            .run();
    }

    #[test]
    fn recording_observer_captures_each_notification() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let probe = RecordingObserver::new();
        store.subscribe(probe.callback());

        let _ = store.send(TallyAction::Bump);
        let _ = store.send(TallyAction::Ignore);
        let _ = store.send(TallyAction::Bump);

        assert_eq!(probe.len(), 2);
        assert_eq!(probe.last(), Some(TallyState { total: 2 }));
        assert_eq!(
            probe.snapshots(),
            vec![TallyState { total: 1 }, TallyState { total: 2 }]
        );
    }
}
