//! # Reducer Kit Testing
//!
//! Testing utilities and helpers for the Reducer Kit state container.
//!
//! This crate provides:
//! - A Given-When-Then builder for reducers ([`ReducerTest`])
//! - A recording listener for observing store notifications
//! - Property helpers for the immutability and passthrough contracts
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use reducer_kit_testing::RecordingListener;
//! use reducer_kit_runtime::Store;
//!
//! #[test]
//! fn test_counter_notifies() {
//!     let mut store = Store::new(CounterReducer);
//!     let recorder = RecordingListener::new();
//!     let _sub = recorder.attach(&mut store);
//!
//!     store.dispatch(CounterAction::Increment);
//!
//!     assert_eq!(recorder.call_count(), 1);
//! }
//! ```

use reducer_kit_core::reducer::Reducer;
use reducer_kit_runtime::{Store, StoreConfig, Subscription};
use std::sync::{Arc, Mutex, PoisonError};


/// Mock collaborators for store tests
pub mod mocks {
    use super::{Arc, Mutex, PoisonError, Reducer, Store, Subscription};

    /// Listener that records every state it is notified with
    ///
    /// Clones share the same recording, so one clone can be moved into the
    /// store while the test keeps another for assertions.
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_kit_core::reducer::reducer_fn;
    /// use reducer_kit_runtime::Store;
    /// use reducer_kit_testing::mocks::RecordingListener;
    /// use std::sync::Arc;
    ///
    /// let counter = reducer_fn(|| 0_i32, |state: &Arc<i32>, delta: &i32| Arc::new(**state + delta));
    /// let mut store = Store::new(counter);
    ///
    /// let recorder = RecordingListener::new();
    /// let _subscription = recorder.attach(&mut store);
    ///
    /// store.dispatch(1);
    /// store.dispatch(2);
    ///
    /// assert_eq!(recorder.values(), vec![1, 3]);
    /// ```
    #[derive(Debug)]
    pub struct RecordingListener<S> {
        states: Arc<Mutex<Vec<Arc<S>>>>,
    }

    impl<S> Clone for RecordingListener<S> {
        fn clone(&self) -> Self {
            Self {
                states: Arc::clone(&self.states),
            }
        }
    }

    impl<S> Default for RecordingListener<S> {
        fn default() -> Self {
            Self {
                states: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl<S> RecordingListener<S>
    where
        S: Send + Sync + 'static,
    {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// A listener closure feeding this recorder
        pub fn listener(&self) -> impl FnMut(&Arc<S>) + Send + 'static {
            let states = Arc::clone(&self.states);
            move |state: &Arc<S>| {
                states
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(Arc::clone(state));
            }
        }

        /// Subscribe this recorder to `store`
        pub fn attach<A, R>(&self, store: &mut Store<S, A, R>) -> Subscription
        where
            R: Reducer<State = S, Action = A>,
        {
            store.subscribe(self.listener())
        }

        /// Every state received, in notification order
        #[must_use]
        pub fn states(&self) -> Vec<Arc<S>> {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of notifications received
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// The most recent state received
        #[must_use]
        pub fn last(&self) -> Option<Arc<S>> {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }
    }

    impl<S> RecordingListener<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        /// Every state received, cloned out of its `Arc`
        #[must_use]
        pub fn values(&self) -> Vec<S> {
            self.states
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|state| (**state).clone())
                .collect()
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Reads `RUST_LOG`, defaulting to `warn`. Safe to call from every test;
    /// only the first call installs a subscriber.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities
///
/// Helpers that check the reducer contract: published states are never
/// mutated, and ignored actions pass the state through untouched.
pub mod properties {
    use super::{Arc, Reducer, Store, StoreConfig};
    use proptest::collection;
    use proptest::strategy::Strategy;
    use std::fmt::Debug;

    /// Strategy producing sequences of up to `max_len` actions
    pub fn action_sequences<S>(action: S, max_len: usize) -> impl Strategy<Value = Vec<S::Value>>
    where
        S: Strategy,
    {
        collection::vec(action, 0..=max_len)
    }

    /// Dispatch `actions` through a fresh store and check no published state changed
    ///
    /// Every state the store publishes (the initial one and each dispatch
    /// result) is snapshotted by value right away. After the whole sequence,
    /// each published `Arc` must still equal its snapshot.
    ///
    /// # Panics
    ///
    /// Panics if a previously published state no longer equals its snapshot.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_mutation<R, I>(reducer: R, actions: I)
    where
        R: Reducer,
        R::State: Clone + PartialEq + Debug,
        I: IntoIterator<Item = R::Action>,
    {
        let mut store = Store::with_config(reducer, StoreConfig::default().with_metrics(false));

        let initial = Arc::clone(store.state());
        let mut published = vec![((*initial).clone(), initial)];

        for action in actions {
            let next = store.dispatch(action);
            published.push(((*next).clone(), next));
        }

        for (index, (snapshot, state)) in published.iter().enumerate() {
            assert_eq!(
                snapshot, &**state,
                "state published at step {index} was mutated after publication"
            );
        }
    }

    /// Assert that `reducer` returns `state` itself for `action`
    ///
    /// # Panics
    ///
    /// Panics if the reducer allocated a new state.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_passthrough<R>(reducer: &R, state: &Arc<R::State>, action: &R::Action)
    where
        R: Reducer,
        R::State: Debug,
        R::Action: Debug,
    {
        let next = reducer.reduce(state, action);
        assert!(
            Arc::ptr_eq(state, &next),
            "expected {action:?} to pass {state:?} through, got {next:?}"
        );
    }
}

// Re-export commonly used items
pub use mocks::RecordingListener;
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;
    use reducer_kit_core::reducer::reducer_fn;

    fn adder() -> impl Reducer<State = i32, Action = i32> {
        reducer_fn(
            || 0,
            |state: &Arc<i32>, delta: &i32| {
                if *delta == 0 {
                    Arc::clone(state)
                } else {
                    Arc::new(**state + delta)
                }
            },
        )
    }

    #[test]
    fn test_recording_listener_records_in_order() {
        let mut store = Store::new(adder());
        let recorder = RecordingListener::new();
        let _sub = recorder.attach(&mut store);

        store.dispatch(1);
        store.dispatch(0);
        store.dispatch(5);

        assert_eq!(recorder.call_count(), 3);
        assert_eq!(recorder.values(), vec![1, 1, 6]);
        assert_eq!(recorder.last().map(|s| *s), Some(6));

        let states = recorder.states();
        assert!(Arc::ptr_eq(&states[0], &states[1]));
    }

    #[test]
    fn test_recording_listener_clones_share_recording() {
        let mut store = Store::new(adder());
        let recorder = RecordingListener::new();
        let clone = recorder.clone();
        let _sub = store.subscribe(clone.listener());

        store.dispatch(2);
        assert_eq!(recorder.values(), vec![2]);
    }

    #[test]
    fn test_assert_no_mutation_accepts_pure_reducer() {
        properties::assert_no_mutation(adder(), vec![1, 2, 0, -3]);
    }

    #[test]
    fn test_assert_passthrough_accepts_ignored_action() {
        properties::assert_passthrough(&adder(), &Arc::new(4), &0);
    }

    #[test]
    #[should_panic(expected = "to pass")]
    fn test_assert_passthrough_rejects_change() {
        properties::assert_passthrough(&adder(), &Arc::new(4), &1);
    }

    #[test]
    fn test_reducer_test_starts_from_published_state() {
        let mut store = Store::with_config(adder(), StoreConfig::default().with_metrics(false));
        let published = store.dispatch(3);

        ReducerTest::new(adder())
            .given_shared_state(Arc::clone(&published))
            .when_action(0)
            .then_state(|state| assert_eq!(*state, 3))
            .then_transition(move |given, next| {
                assert!(Arc::ptr_eq(given, &published));
                assertions::assert_unchanged(given, next);
            })
            .run();
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        helpers::init_test_tracing();
        helpers::init_test_tracing();
    }
}
