//! # Unistore Runtime
//!
//! Runtime implementation for the Unistore state container.
//!
//! This crate provides the Store that coordinates reducer execution and
//! synchronous observer fan-out.
//!
//! ## Core Components
//!
//! - **Store**: exclusive owner of state; all mutation goes through `send`
//! - **Observer registry**: token → callback mapping, invoked in
//!   registration order after each state-changing action
//!
//! ## Concurrency model
//!
//! All operations run to completion on the calling thread. Nothing
//! suspends or blocks on external resources. When the host is
//! multi-threaded, mutating calls are serialized behind a single
//! exclusive dispatch lock, and reads are served from a snapshot taken
//! under the state lock so callers never observe a torn state.
//!
//! ## Example
//!
//! ```ignore
//! use unistore_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let token = store.subscribe(|state| println!("{state:?}"));
//! store.send(Action::DoSomething);
//! store.unsubscribe(token);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use unistore_core::reducer::{Change, Reducer};

/// Token identifying one subscription.
///
/// Returned by [`Store::subscribe`] and redeemed by [`Store::unsubscribe`].
/// Tokens are unique per store for the lifetime of the store and are never
/// reused, so redeeming a stale token is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// Observer callback invoked with a read-only view of state after each
/// state-changing action.
type Observer<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// The Store - exclusive owner of one piece of domain state
///
/// The Store manages:
/// 1. State (behind a lock; no external aliasing)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Observer fan-out (synchronous, registration order)
///
/// # Ordering guarantee
///
/// `send` calls are applied in invocation order. Every observer sees the
/// new state before `send` returns, so a subscriber reading state after
/// action A completes and before action B starts sees exactly A's result.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(TodoState::new(), TodoReducer::new(), env);
///
/// store.send(TodoAction::Toggle { id });
/// let total = store.state(|s| s.count());
/// ```
pub struct Store<R: Reducer> {
    state: RwLock<R::State>,
    reducer: R,
    environment: R::Environment,
    observers: Mutex<Vec<(SubscriberId, Observer<R::State>)>>,
    next_subscriber: AtomicU64,
    /// Serializes mutating calls so reducer runs and observer fan-outs
    /// from different threads never interleave.
    dispatch: Mutex<()>,
}

impl<R> Store<R>
where
    R: Reducer,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Stores are explicitly constructed and passed by reference (or
    /// `Arc`) to collaborators; there is no process-wide instance.
    ///
    /// # Arguments
    ///
    /// - `initial_state`: The starting state for the store
    /// - `reducer`: The reducer implementation (business logic)
    /// - `environment`: Injected dependencies
    #[must_use]
    pub const fn new(initial_state: R::State, reducer: R, environment: R::Environment) -> Self {
        Self {
            state: RwLock::new(initial_state),
            reducer,
            environment,
            observers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(0),
            dispatch: Mutex::new(()),
        }
    }

    /// Send an action to the store
    ///
    /// This is the only way to mutate state:
    /// 1. Acquires the dispatch lock (serializing concurrent senders)
    /// 2. Runs the reducer under the state write lock
    /// 3. If the reducer mutated state, invokes every current observer
    ///    with the new state, in registration order, before returning
    ///
    /// Actions the reducer rejects (invalid input, unknown ids) leave
    /// state untouched and produce no fan-out.
    ///
    /// # Returns
    ///
    /// The reducer's [`Change`] outcome, so callers can tell an applied
    /// action from a silent no-op.
    ///
    /// # Panics
    ///
    /// If the reducer panics, the panic propagates to the caller.
    /// Reducers are pure functions and should not panic.
    #[tracing::instrument(skip_all, name = "store_send")]
    pub fn send(&self, action: R::Action) -> Change {
        let _dispatch = self
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        metrics::counter!("store.actions.total").increment(1);

        let change = {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            let start = std::time::Instant::now();
            let change = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            change
        };

        match change {
            Change::Changed => {
                tracing::trace!("action mutated state, notifying observers");
                self.notify();
            }
            Change::Unchanged => {
                tracing::trace!("action was a no-op, skipping fan-out");
                metrics::counter!("store.actions.noop").increment(1);
            }
        }

        change
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the lock is released promptly:
    ///
    /// ```ignore
    /// let total = store.state(|s| s.todos.len());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R::State) -> T,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Clone the current state
    #[must_use]
    pub fn snapshot(&self) -> R::State
    where
        R::State: Clone,
    {
        self.state(Clone::clone)
    }

    /// Borrow the injected environment
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// Register an observer, returning its subscription token
    ///
    /// The observer is invoked synchronously with a read-only view of
    /// state after every state-changing action, in registration order
    /// relative to other observers. It is not invoked at registration
    /// time with the current state.
    ///
    /// Observers must not call mutating store operations reentrantly;
    /// they may subscribe or unsubscribe, and such registry changes take
    /// effect from the next notification.
    pub fn subscribe<F>(&self, observer: F) -> SubscriberId
    where
        F: Fn(&R::State) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::Relaxed));
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        observers.push((id, Arc::new(observer)));

        // Precision loss acceptable for gauge values (registry sizes < 2^52)
        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!("store.observers").set(observers.len() as f64);
        tracing::debug!(subscriber = %id, observers = observers.len(), "observer registered");

        id
    }

    /// Remove the subscription identified by `token`
    ///
    /// Returns `true` if an entry was removed, `false` if the token was
    /// unknown or already redeemed.
    pub fn unsubscribe(&self, token: SubscriberId) -> bool {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(id, _)| *id != token);
        let removed = observers.len() < before;

        if removed {
            #[allow(clippy::cast_precision_loss)]
            metrics::gauge!("store.observers").set(observers.len() as f64);
            tracing::debug!(subscriber = %token, "observer removed");
        }

        removed
    }

    /// Number of currently registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invoke every registered observer with the current state
    ///
    /// The registry is snapshotted before invocation so observers may
    /// subscribe/unsubscribe from inside a callback without deadlocking;
    /// those changes are seen by the next notification, not this one.
    fn notify(&self) {
        let snapshot: Vec<(SubscriberId, Observer<R::State>)> = {
            let observers = self
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            observers.clone()
        };

        if snapshot.is_empty() {
            return;
        }

        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        for (id, observer) in &snapshot {
            tracing::trace!(subscriber = %id, "notifying observer");
            observer(&state);
        }

        metrics::counter!("store.notifications.total").increment(snapshot.len() as u64);
    }
}

impl<R> std::fmt::Debug for Store<R>
where
    R: Reducer + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("reducer", &self.reducer)
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}
