//! # Reducer Kit Runtime
//!
//! Runtime implementation for the Reducer Kit state container.
//!
//! This crate provides the Store: the single owner of the current state,
//! which runs the root reducer on every dispatched action and notifies
//! subscribers.
//!
//! ## Core Components
//!
//! - **Store**: Holds the state slot and exposes `state`, `dispatch`, `subscribe`
//! - **`StoreConfig`**: Naming, history and metrics settings
//! - **Subscription**: Token returned by `subscribe`, handed back to `unsubscribe`
//!
//! ## Execution Model
//!
//! Everything is synchronous. `dispatch` runs the reducer and then every
//! listener, in registration order, before returning. `dispatch` takes
//! `&mut self` and listeners only see the new state, so a dispatch can never
//! be re-entered from inside another one.
//!
//! ## Example
//!
//! ```
//! use reducer_kit_core::reducer::reducer_fn;
//! use reducer_kit_runtime::Store;
//! use std::sync::Arc;
//!
//! let counter = reducer_fn(|| 0_i64, |state: &Arc<i64>, delta: &i64| Arc::new(**state + delta));
//! let mut store = Store::new(counter);
//!
//! let subscription = store.subscribe(|state| println!("count = {state}"));
//! store.dispatch(2);
//! assert_eq!(**store.state(), 2);
//!
//! assert!(store.unsubscribe(subscription));
//! ```

use reducer_kit_core::reducer::Reducer;
use std::collections::VecDeque;
use std::sync::Arc;

/// Metric names and descriptions
pub mod metrics;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use reducer_kit_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_name("todo-app")
///     .with_history_limit(50)
///     .with_metrics(false);
///
/// assert_eq!(config.history_limit, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Name recorded on the store's tracing spans
    pub name: String,
    /// Number of previous states kept by the store (0 disables history)
    pub history_limit: usize,
    /// Whether dispatches are recorded through the `metrics` facade
    pub record_metrics: bool,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, history_limit: usize, record_metrics: bool) -> Self {
        Self {
            name: name.into(),
            history_limit,
            record_metrics,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set how many previous states to keep
    #[must_use]
    pub const fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Enable or disable metrics recording
    #[must_use]
    pub const fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            history_limit: 0,
            record_metrics: true,
        }
    }
}

/// Handle identifying a registered listener
///
/// Returned by [`Store::subscribe`]; pass it to [`Store::unsubscribe`] to
/// stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    /// Numeric id of the subscription, unique per store
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Store module - the runtime holder of the current state
pub mod store {
    use super::{Arc, Reducer, StoreConfig, Subscription, VecDeque};
    use crate::metrics::{
        counter, gauge, histogram, DISPATCH_TOTAL, LISTENERS_NOTIFIED_TOTAL,
        REDUCER_DURATION_SECONDS, STATE_CHANGES_TOTAL, SUBSCRIPTIONS_ACTIVE,
    };
    use smallvec::SmallVec;

    /// Callback invoked with the new state after every dispatch
    type Listener<S> = Box<dyn FnMut(&Arc<S>) + Send>;

    /// The Store - runtime holder of a reducer's state
    ///
    /// The Store manages:
    /// 1. State (a single `Arc` slot, replaced on every dispatch)
    /// 2. Reducer (the root reducer, usually a combinator)
    /// 3. Listeners (called after every dispatch, in registration order)
    /// 4. History (optional, bounded list of previous states)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_kit_core::reducer::reducer_fn;
    /// use reducer_kit_runtime::Store;
    /// use std::sync::Arc;
    ///
    /// let todos = reducer_fn(Vec::<String>::new, |state: &Arc<Vec<String>>, text: &String| {
    ///     let mut next = (**state).clone();
    ///     next.push(text.clone());
    ///     Arc::new(next)
    /// });
    ///
    /// let mut store = Store::new(todos);
    /// store.dispatch("write docs".to_string());
    /// assert_eq!(store.state().len(), 1);
    /// ```
    pub struct Store<S, A, R>
    where
        R: Reducer<State = S, Action = A>,
    {
        state: Arc<S>,
        reducer: R,
        config: StoreConfig,
        listeners: SmallVec<[(Subscription, Listener<S>); 4]>,
        next_subscription: u64,
        history: VecDeque<Arc<S>>,
        dispatch_count: u64,
    }

    impl<S, A, R> Store<S, A, R>
    where
        R: Reducer<State = S, Action = A>,
    {
        /// Create a new store starting from the reducer's initial state
        ///
        /// # Arguments
        ///
        /// - `reducer`: The root reducer
        ///
        /// # Returns
        ///
        /// A new Store instance ready to process actions
        #[must_use]
        pub fn new(reducer: R) -> Self {
            Self::with_config(reducer, StoreConfig::default())
        }

        /// Create a new store starting from a preloaded state
        ///
        /// # Arguments
        ///
        /// - `reducer`: The root reducer
        /// - `state`: The state to start from, e.g. restored by the caller
        #[must_use]
        pub fn with_state(reducer: R, state: Arc<S>) -> Self {
            Self::with_state_and_config(reducer, state, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        ///
        /// # Example
        ///
        /// ```
        /// use reducer_kit_core::reducer::reducer_fn;
        /// use reducer_kit_runtime::{Store, StoreConfig};
        /// use std::sync::Arc;
        ///
        /// let counter = reducer_fn(|| 0_i64, |state: &Arc<i64>, delta: &i64| Arc::new(**state + delta));
        /// let mut store = Store::with_config(counter, StoreConfig::default().with_history_limit(2));
        ///
        /// store.dispatch(1);
        /// store.dispatch(1);
        /// store.dispatch(1);
        ///
        /// let history: Vec<i64> = store.history().iter().map(|s| **s).collect();
        /// assert_eq!(history, vec![1, 2]);
        /// ```
        #[must_use]
        pub fn with_config(reducer: R, config: StoreConfig) -> Self {
            let state = Arc::new(reducer.initial_state());
            Self::with_state_and_config(reducer, state, config)
        }

        /// Create a new store from a preloaded state and custom configuration
        #[must_use]
        pub fn with_state_and_config(reducer: R, state: Arc<S>, config: StoreConfig) -> Self {
            tracing::debug!(store = %config.name, "Store created");

            Self {
                state,
                reducer,
                history: VecDeque::new(),
                config,
                listeners: SmallVec::new(),
                next_subscription: 0,
                dispatch_count: 0,
            }
        }

        /// Current state snapshot
        ///
        /// The returned `Arc` is never mutated by later dispatches; clone it
        /// to keep a snapshot around.
        #[must_use]
        pub const fn state(&self) -> &Arc<S> {
            &self.state
        }

        /// Read current state via a closure
        ///
        /// ```
        /// use reducer_kit_core::reducer::reducer_fn;
        /// use reducer_kit_runtime::Store;
        /// use std::sync::Arc;
        ///
        /// let items = reducer_fn(Vec::<u32>::new, |state: &Arc<Vec<u32>>, _: &()| Arc::clone(state));
        /// let store = Store::new(items);
        /// assert_eq!(store.select(Vec::len), 0);
        /// ```
        pub fn select<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Dispatch an action
        ///
        /// This is the only way to change the state:
        /// 1. Runs the root reducer with (current state, action)
        /// 2. Replaces the current state with the result
        /// 3. Calls every listener with the new state, in registration order
        ///
        /// Listeners are notified on every dispatch, including dispatches
        /// that left the state pointer-equal to the previous one.
        ///
        /// # Returns
        ///
        /// The new state.
        ///
        /// # Panics
        ///
        /// If the reducer or a listener panics, the panic propagates. The state
        /// slot is replaced before listeners run.
        #[tracing::instrument(skip(self, action), fields(store = %self.config.name), name = "store_dispatch")]
        pub fn dispatch(&mut self, action: A) -> Arc<S> {
            tracing::debug!("Processing action");

            let next = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let next = self.reducer.reduce(&self.state, &action);
                if self.config.record_metrics {
                    histogram!(REDUCER_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
                }

                next
            };

            let previous = std::mem::replace(&mut self.state, next);
            let changed = !Arc::ptr_eq(&previous, &self.state);
            self.remember(previous);
            self.dispatch_count += 1;

            if self.config.record_metrics {
                counter!(DISPATCH_TOTAL).increment(1);
                if changed {
                    counter!(STATE_CHANGES_TOTAL).increment(1);
                }
            }

            tracing::trace!(changed, listeners = self.listeners.len(), "Notifying listeners");
            for (_, listener) in &mut self.listeners {
                listener(&self.state);
            }

            if self.config.record_metrics && !self.listeners.is_empty() {
                counter!(LISTENERS_NOTIFIED_TOTAL).increment(self.listeners.len() as u64);
            }

            tracing::debug!(dispatch_count = self.dispatch_count, "Action processing completed");
            Arc::clone(&self.state)
        }

        /// Register a listener called after every dispatch
        ///
        /// # Returns
        ///
        /// A [`Subscription`] to pass to [`Store::unsubscribe`].
        #[must_use = "dropping the subscription makes the listener impossible to remove"]
        pub fn subscribe<F>(&mut self, listener: F) -> Subscription
        where
            F: FnMut(&Arc<S>) + Send + 'static,
        {
            let subscription = Subscription(self.next_subscription);
            self.next_subscription += 1;
            self.listeners.push((subscription, Box::new(listener)));

            tracing::debug!(
                store = %self.config.name,
                subscription = subscription.id(),
                "Listener subscribed"
            );
            self.record_subscriptions();
            subscription
        }

        /// Remove a listener
        ///
        /// # Returns
        ///
        /// `true` if the listener was registered, `false` if it had already
        /// been removed.
        pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
            let Some(index) = self
                .listeners
                .iter()
                .position(|(registered, _)| *registered == subscription)
            else {
                tracing::trace!(subscription = subscription.id(), "Unknown subscription");
                return false;
            };

            // `remove` keeps the remaining listeners in registration order
            drop(self.listeners.remove(index));
            tracing::debug!(
                store = %self.config.name,
                subscription = subscription.id(),
                "Listener unsubscribed"
            );
            self.record_subscriptions();
            true
        }

        /// Number of registered listeners
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.listeners.len()
        }

        /// Swap the root reducer, keeping the current state
        ///
        /// The next dispatch runs the new reducer against the current state.
        /// Branches the new reducer introduces are initialized on that
        /// dispatch by their own reducers.
        ///
        /// # Returns
        ///
        /// The previous reducer.
        pub fn replace_reducer(&mut self, reducer: R) -> R {
            tracing::info!(store = %self.config.name, "Replacing root reducer");
            std::mem::replace(&mut self.reducer, reducer)
        }

        /// Previous states, oldest first
        ///
        /// Holds at most [`StoreConfig::history_limit`] entries.
        #[must_use]
        pub const fn history(&self) -> &VecDeque<Arc<S>> {
            &self.history
        }

        /// Number of dispatches processed since creation
        #[must_use]
        pub const fn dispatch_count(&self) -> u64 {
            self.dispatch_count
        }

        /// The store configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        fn remember(&mut self, previous: Arc<S>) {
            let limit = self.config.history_limit;
            if limit == 0 {
                return;
            }

            if self.history.len() == limit {
                self.history.pop_front();
            }
            self.history.push_back(previous);
        }

        fn record_subscriptions(&self) {
            if self.config.record_metrics {
                // Note: Precision loss acceptable for metrics (listener counts < 2^52)
                #[allow(clippy::cast_precision_loss)]
                gauge!(SUBSCRIPTIONS_ACTIVE).set(self.listeners.len() as f64);
            }
        }
    }

    impl<S, A, R> std::fmt::Debug for Store<S, A, R>
    where
        S: std::fmt::Debug,
        R: Reducer<State = S, Action = A>,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("config", &self.config)
                .field("listeners", &self.listeners.len())
                .field("history", &self.history.len())
                .field("dispatch_count", &self.dispatch_count)
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;
