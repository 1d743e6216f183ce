//! # Reducer Kit Core
//!
//! Core traits and types for the Reducer Kit state container.
//!
//! This crate provides the pure half of the Redux pattern: reducers and the
//! combinators that compose them. The runtime half (the `Store`) lives in
//! `reducer-kit-runtime`.
//!
//! ## Core Concepts
//!
//! - **State**: An immutable value shared through `Arc`
//! - **Action**: Tagged data describing an intended state change
//! - **Reducer**: Pure function `(&Arc<State>, &Action) → Arc<State>`
//! - **Combinator**: A reducer built from named sub-reducers over a composite state
//!
//! ## Architecture Principles
//!
//! - Total functions: every reducer answers every action
//! - Unchanged state is returned as the same `Arc`, so callers can detect
//!   change with `Arc::ptr_eq`
//! - Published states are never mutated
//!
//! ## Example
//!
//! ```
//! use reducer_kit_core::reducer::Reducer;
//! use std::sync::Arc;
//!
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = i64;
//!     type Action = CounterAction;
//!
//!     fn initial_state(&self) -> i64 {
//!         0
//!     }
//!
//!     fn reduce(&self, state: &Arc<i64>, action: &CounterAction) -> Arc<i64> {
//!         match action {
//!             CounterAction::Increment => Arc::new(**state + 1),
//!             CounterAction::Decrement => Arc::new(**state - 1),
//!         }
//!     }
//! }
//!
//! let reducer = CounterReducer;
//! let state = reducer.reduce_or_init(None, &CounterAction::Increment);
//! assert_eq!(*state, 1);
//! ```

/// Keyed, type-erased reducer composition
pub mod composition;

/// Declarative macro for statically typed reducer composition
mod combine_macros;

/// Error types for reducer composition
pub mod error {
    use thiserror::Error;

    /// Errors raised while assembling a [`CombinedReducer`](crate::composition::CombinedReducer)
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum CombineError {
        /// A reducer was registered twice under the same key
        ///
        /// Keys name branches of the composite state and must be unique.
        #[error("reducer key `{0}` is already registered")]
        DuplicateKey(String),
    }

    /// Errors raised when reading a branch of a [`CombinedState`](crate::composition::CombinedState)
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StateError {
        /// No branch exists under the requested key
        #[error("no state registered under key `{0}`")]
        MissingKey(String),

        /// The branch exists but holds a different type
        #[error("state under key `{key}` is not a `{expected}`")]
        TypeMismatch {
            /// Key of the offending branch
            key: String,
            /// Type name the caller asked for
            expected: &'static str,
        },
    }
}

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → State`.
///
/// They hold no hidden state, perform no I/O, and are deterministic and testable.
pub mod reducer {
    use std::marker::PhantomData;
    use std::sync::Arc;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: The action type this reducer processes
    ///
    /// # Contract
    ///
    /// - `reduce` must answer every action. Actions the reducer does not
    ///   care about return the input `Arc` unchanged (`Arc::clone(state)`).
    /// - `reduce` must never mutate the state behind `state`; a change is
    ///   expressed by returning a freshly allocated `Arc`.
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_kit_core::reducer::Reducer;
    /// use std::sync::Arc;
    ///
    /// enum FilterAction {
    ///     SetFilter(String),
    ///     Other,
    /// }
    ///
    /// struct FilterReducer;
    ///
    /// impl Reducer for FilterReducer {
    ///     type State = String;
    ///     type Action = FilterAction;
    ///
    ///     fn initial_state(&self) -> String {
    ///         "SHOW_ALL".to_string()
    ///     }
    ///
    ///     fn reduce(&self, state: &Arc<String>, action: &FilterAction) -> Arc<String> {
    ///         match action {
    ///             FilterAction::SetFilter(filter) => Arc::new(filter.clone()),
    ///             FilterAction::Other => Arc::clone(state),
    ///         }
    ///     }
    /// }
    ///
    /// let state = Arc::new(FilterReducer.initial_state());
    /// let next = FilterReducer.reduce(&state, &FilterAction::Other);
    /// assert!(Arc::ptr_eq(&state, &next));
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The state this reducer starts from when no prior state exists
        fn initial_state(&self) -> Self::State;

        /// Reduce an action into the next state
        ///
        /// # Arguments
        ///
        /// - `state`: The current state
        /// - `action`: The action to process
        ///
        /// # Returns
        ///
        /// The next state. Returns `state` itself (pointer-equal) when the
        /// action does not concern this reducer.
        fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;

        /// Reduce from an optional state, falling back to [`Reducer::initial_state`]
        ///
        /// This is how a composite reducer feeds a branch that has never been
        /// reduced before.
        fn reduce_or_init(
            &self,
            state: Option<&Arc<Self::State>>,
            action: &Self::Action,
        ) -> Arc<Self::State> {
            match state {
                Some(state) => self.reduce(state, action),
                None => {
                    let initial = Arc::new(self.initial_state());
                    self.reduce(&initial, action)
                },
            }
        }
    }

    impl<R: Reducer + ?Sized> Reducer for Box<R> {
        type State = R::State;
        type Action = R::Action;

        fn initial_state(&self) -> Self::State {
            (**self).initial_state()
        }

        fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
            (**self).reduce(state, action)
        }
    }

    impl<R: Reducer + ?Sized> Reducer for Arc<R> {
        type State = R::State;
        type Action = R::Action;

        fn initial_state(&self) -> Self::State {
            (**self).initial_state()
        }

        fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
            (**self).reduce(state, action)
        }
    }

    /// A reducer built from an initializer and a closure
    ///
    /// Created by [`reducer_fn`].
    pub struct FnReducer<S, A, I, F> {
        init: I,
        reduce: F,
        _phantom: PhantomData<fn(&S, &A) -> S>,
    }

    impl<S, A, I, F> std::fmt::Debug for FnReducer<S, A, I, F> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FnReducer").finish_non_exhaustive()
        }
    }

    impl<S, A, I, F> Clone for FnReducer<S, A, I, F>
    where
        I: Clone,
        F: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                init: self.init.clone(),
                reduce: self.reduce.clone(),
                _phantom: PhantomData,
            }
        }
    }

    impl<S, A, I, F> Reducer for FnReducer<S, A, I, F>
    where
        I: Fn() -> S,
        F: Fn(&Arc<S>, &A) -> Arc<S>,
    {
        type State = S;
        type Action = A;

        fn initial_state(&self) -> S {
            (self.init)()
        }

        fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
            (self.reduce)(state, action)
        }
    }

    /// Build a reducer from a closure
    ///
    /// `init` supplies the default state, `reduce` computes the next one.
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_kit_core::reducer::{reducer_fn, Reducer};
    /// use std::sync::Arc;
    ///
    /// let counter = reducer_fn(
    ///     || 0_i64,
    ///     |state: &Arc<i64>, delta: &i64| {
    ///         if *delta == 0 {
    ///             Arc::clone(state)
    ///         } else {
    ///             Arc::new(**state + delta)
    ///         }
    ///     },
    /// );
    ///
    /// let state = counter.reduce_or_init(None, &3);
    /// assert_eq!(*state, 3);
    /// ```
    #[must_use]
    pub const fn reducer_fn<S, A, I, F>(init: I, reduce: F) -> FnReducer<S, A, I, F>
    where
        I: Fn() -> S,
        F: Fn(&Arc<S>, &A) -> Arc<S>,
    {
        FnReducer {
            init,
            reduce,
            _phantom: PhantomData,
        }
    }
}

// Re-export commonly used types
pub use composition::{CombinedReducer, CombinedState};
pub use error::{CombineError, StateError};
pub use reducer::{reducer_fn, FnReducer, Reducer};
