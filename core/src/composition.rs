//! Reducer composition utilities
//!
//! This module provides the keyed combinator: a registry mapping string keys
//! to reducers, folded into a single root reducer over a [`CombinedState`].
//!
//! - **`CombinedReducer`**: Runs every registered reducer on its own branch
//! - **`CombinedState`**: The composite state, one type-erased branch per key
//!
//! For a statically typed composite see [`combine_reducers!`](crate::combine_reducers).
//!
//! # Examples
//!
//! ```
//! use reducer_kit_core::composition::CombinedReducer;
//! use reducer_kit_core::reducer::{reducer_fn, Reducer};
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! let counter = reducer_fn(|| 0_i64, |state: &Arc<i64>, action: &AppAction| match action {
//!     AppAction::Increment => Arc::new(**state + 1),
//!     AppAction::SetName(_) => Arc::clone(state),
//! });
//!
//! let name = reducer_fn(String::new, |state: &Arc<String>, action: &AppAction| match action {
//!     AppAction::SetName(name) => Arc::new(name.clone()),
//!     AppAction::Increment => Arc::clone(state),
//! });
//!
//! let root = CombinedReducer::new()
//!     .with("counter", counter)?
//!     .with("name", name)?;
//!
//! let state = root.reduce_or_init(None, &AppAction::Increment);
//! assert_eq!(state.get::<i64>("counter").map(|c| *c), Some(1));
//! assert_eq!(state.get::<String>("name").as_deref().map(String::as_str), Some(""));
//! # Ok::<(), reducer_kit_core::error::CombineError>(())
//! ```

use crate::error::{CombineError, StateError};
use crate::reducer::Reducer;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A type-erased branch of a composite state
type Branch = Arc<dyn Any + Send + Sync>;

/// Object-safe view of a reducer whose state is stored type-erased.
trait ErasedReducer<A>: Send + Sync {
    fn initial_branch(&self) -> Branch;

    fn reduce_branch(&self, key: &str, state: Option<&Branch>, action: &A) -> Branch;

    fn state_type_name(&self) -> &'static str;
}

struct Erased<R>(R);

impl<R> ErasedReducer<R::Action> for Erased<R>
where
    R: Reducer + Send + Sync,
    R::State: Send + Sync + 'static,
{
    fn initial_branch(&self) -> Branch {
        Arc::new(self.0.initial_state())
    }

    fn reduce_branch(&self, key: &str, state: Option<&Branch>, action: &R::Action) -> Branch {
        let typed = match state {
            Some(branch) => {
                if let Ok(typed) = Arc::clone(branch).downcast::<R::State>() {
                    Some(typed)
                } else {
                    tracing::warn!(
                        key,
                        expected = self.state_type_name(),
                        "Branch holds an unexpected type, reinitializing"
                    );
                    None
                }
            },
            None => None,
        };

        self.0.reduce_or_init(typed.as_ref(), action)
    }

    fn state_type_name(&self) -> &'static str {
        std::any::type_name::<R::State>()
    }
}

/// Composite state produced by a [`CombinedReducer`]
///
/// Holds one branch per registered key. Branches are shared `Arc`s: a branch
/// whose reducer ignored the last action is pointer-equal to the same branch
/// of the previous composite.
#[derive(Clone, Default)]
pub struct CombinedState {
    branches: BTreeMap<Arc<str>, Branch>,
}

impl CombinedState {
    /// Create an empty composite
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch, typically to build a preloaded state
    ///
    /// Replaces any existing branch under `key`.
    #[must_use]
    pub fn with_branch<T>(mut self, key: impl Into<Arc<str>>, value: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.branches.insert(key.into(), value);
        self
    }

    /// Typed access to a branch
    ///
    /// Returns `None` if the key is absent or holds another type.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.branches
            .get(key)
            .and_then(|branch| Arc::clone(branch).downcast::<T>().ok())
    }

    /// Typed access to a branch, reporting why it failed
    ///
    /// # Errors
    ///
    /// - [`StateError::MissingKey`] if no branch exists under `key`
    /// - [`StateError::TypeMismatch`] if the branch holds another type
    pub fn try_get<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>, StateError> {
        let branch = self
            .branches
            .get(key)
            .ok_or_else(|| StateError::MissingKey(key.to_string()))?;

        Arc::clone(branch)
            .downcast::<T>()
            .map_err(|_| StateError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Whether a branch exists under `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.branches.contains_key(key)
    }

    /// Branch keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.branches.keys().map(|key| &**key)
    }

    /// Number of branches
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Whether the composite has no branches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Keys whose branch differs from `previous`
    ///
    /// A branch counts as changed when it is not pointer-equal to the
    /// branch under the same key in `previous`, or when `previous` lacks it.
    #[must_use]
    pub fn changed_keys(&self, previous: &Self) -> Vec<&str> {
        self.branches
            .iter()
            .filter(|(key, branch)| {
                previous
                    .branches
                    .get(*key)
                    .is_none_or(|old| !Arc::ptr_eq(old, branch))
            })
            .map(|(key, _)| &**key)
            .collect()
    }

    /// Whether the branch under `key` is pointer-equal in both composites
    #[must_use]
    pub fn same_branch(&self, previous: &Self, key: &str) -> bool {
        match (self.branches.get(key), previous.branches.get(key)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedState")
            .field("keys", &self.branches.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A root reducer folding a registry of named reducers
///
/// Every action flows through every registered reducer. Each reducer sees
/// only its own branch; the results are collected into a new
/// [`CombinedState`] keyed identically.
pub struct CombinedReducer<A> {
    reducers: Vec<(Arc<str>, Box<dyn ErasedReducer<A>>)>,
}

impl<A> Default for CombinedReducer<A> {
    fn default() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }
}

impl<A> std::fmt::Debug for CombinedReducer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.reducers
                    .iter()
                    .map(|(key, reducer)| (key, reducer.state_type_name())),
            )
            .finish()
    }
}

impl<A: 'static> CombinedReducer<A> {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reducer` under `key`
    ///
    /// By convention, keys are named after the reducers that manage them.
    ///
    /// # Errors
    ///
    /// Returns [`CombineError::DuplicateKey`] if `key` is already registered.
    pub fn with<R>(mut self, key: impl Into<Arc<str>>, reducer: R) -> Result<Self, CombineError>
    where
        R: Reducer<Action = A> + Send + Sync + 'static,
        R::State: Send + Sync + 'static,
    {
        let key = key.into();
        if self.reducers.iter().any(|(existing, _)| *existing == key) {
            return Err(CombineError::DuplicateKey(key.to_string()));
        }

        tracing::trace!(key = %key, state = std::any::type_name::<R::State>(), "Registered reducer");
        self.reducers.push((key, Box::new(Erased(reducer))));
        Ok(self)
    }

    /// Number of registered reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(key, _)| &**key)
    }
}

impl<A: 'static> Reducer for CombinedReducer<A> {
    type State = CombinedState;
    type Action = A;

    fn initial_state(&self) -> CombinedState {
        if self.reducers.is_empty() {
            tracing::warn!("Combined reducer has no registered reducers");
        }

        CombinedState {
            branches: self
                .reducers
                .iter()
                .map(|(key, reducer)| (Arc::clone(key), reducer.initial_branch()))
                .collect(),
        }
    }

    fn reduce(&self, state: &Arc<CombinedState>, action: &A) -> Arc<CombinedState> {
        let unexpected: Vec<&str> = state
            .keys()
            .filter(|key| !self.reducers.iter().any(|(k, _)| &**k == *key))
            .collect();
        if !unexpected.is_empty() {
            tracing::warn!(
                ?unexpected,
                "State has keys without a registered reducer, they will be dropped"
            );
        }

        let branches = self
            .reducers
            .iter()
            .map(|(key, reducer)| {
                let next = reducer.reduce_branch(key, state.branches.get(key), action);
                (Arc::clone(key), next)
            })
            .collect();

        Arc::new(CombinedState { branches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::reducer_fn;

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        SetName(String),
        Unknown,
    }

    fn counter() -> impl Reducer<State = i32, Action = TestAction> + Send + Sync {
        reducer_fn(
            || 0,
            |state: &Arc<i32>, action: &TestAction| match action {
                TestAction::Increment => Arc::new(**state + 1),
                TestAction::SetName(_) | TestAction::Unknown => Arc::clone(state),
            },
        )
    }

    fn name() -> impl Reducer<State = String, Action = TestAction> + Send + Sync {
        reducer_fn(
            || "anonymous".to_string(),
            |state: &Arc<String>, action: &TestAction| match action {
                TestAction::SetName(name) => Arc::new(name.clone()),
                TestAction::Increment | TestAction::Unknown => Arc::clone(state),
            },
        )
    }

    fn root() -> Result<CombinedReducer<TestAction>, CombineError> {
        CombinedReducer::new().with("counter", counter())?.with("name", name())
    }

    #[test]
    fn test_initial_state_has_every_branch() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let state = root.initial_state();

        assert_eq!(state.len(), 2);
        assert_eq!(*state.try_get::<i32>("counter")?, 0);
        assert_eq!(*state.try_get::<String>("name")?, "anonymous");
        Ok(())
    }

    #[test]
    fn test_first_reduce_initializes_branches() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let state = root.reduce_or_init(None, &TestAction::Increment);

        assert_eq!(*state.try_get::<i32>("counter")?, 1);
        assert_eq!(*state.try_get::<String>("name")?, "anonymous");
        Ok(())
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = CombinedReducer::new()
            .with("counter", counter())
            .and_then(|r| r.with("counter", counter()));

        assert_eq!(
            result.err(),
            Some(CombineError::DuplicateKey("counter".to_string()))
        );
    }

    #[test]
    fn test_always_builds_new_composite() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let state = Arc::new(root.initial_state());
        let next = root.reduce(&state, &TestAction::Unknown);

        assert!(!Arc::ptr_eq(&state, &next));
        assert!(next.changed_keys(&state).is_empty());
        assert!(next.same_branch(&state, "counter"));
        assert!(next.same_branch(&state, "name"));
        Ok(())
    }

    #[test]
    fn test_unrelated_branch_is_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let state = Arc::new(root.initial_state());
        let next = root.reduce(&state, &TestAction::SetName("Alice".to_string()));

        assert_eq!(next.changed_keys(&state), vec!["name"]);
        assert!(next.same_branch(&state, "counter"));
        assert_eq!(*next.try_get::<String>("name")?, "Alice");
        assert_eq!(*state.try_get::<String>("name")?, "anonymous");
        Ok(())
    }

    #[test]
    fn test_try_get_errors() -> Result<(), Box<dyn std::error::Error>> {
        let state = root()?.initial_state();

        assert_eq!(
            state.try_get::<i32>("missing").err(),
            Some(StateError::MissingKey("missing".to_string()))
        );
        assert!(matches!(
            state.try_get::<u64>("counter"),
            Err(StateError::TypeMismatch { .. })
        ));
        assert!(state.get::<u64>("counter").is_none());
        Ok(())
    }

    #[test]
    fn test_preloaded_state_is_respected() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let preloaded = Arc::new(
            CombinedState::new()
                .with_branch("counter", Arc::new(41_i32))
                .with_branch("name", Arc::new("Bob".to_string())),
        );

        let next = root.reduce(&preloaded, &TestAction::Increment);
        assert_eq!(*next.try_get::<i32>("counter")?, 42);
        assert_eq!(*next.try_get::<String>("name")?, "Bob");
        Ok(())
    }

    #[test]
    fn test_unexpected_keys_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let preloaded = Arc::new(
            CombinedState::new()
                .with_branch("counter", Arc::new(1_i32))
                .with_branch("stale", Arc::new(true)),
        );

        let next = root.reduce(&preloaded, &TestAction::Unknown);
        assert!(!next.contains_key("stale"));
        assert_eq!(*next.try_get::<i32>("counter")?, 1);
        assert_eq!(*next.try_get::<String>("name")?, "anonymous");
        Ok(())
    }

    #[test]
    fn test_mistyped_branch_is_reinitialized() -> Result<(), Box<dyn std::error::Error>> {
        let root = root()?;
        let preloaded = Arc::new(CombinedState::new().with_branch("counter", Arc::new("oops")));

        let next = root.reduce(&preloaded, &TestAction::Increment);
        assert_eq!(*next.try_get::<i32>("counter")?, 1);
        Ok(())
    }

    #[test]
    fn test_empty_registry_reduces_to_empty_state() {
        let root: CombinedReducer<TestAction> = CombinedReducer::new();
        assert!(root.is_empty());

        let state = root.reduce_or_init(None, &TestAction::Increment);
        assert!(state.is_empty());
    }

    #[test]
    fn test_keys_follow_registration_order() -> Result<(), Box<dyn std::error::Error>> {
        let root = CombinedReducer::new().with("zeta", counter())?.with("alpha", name())?;
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(root.len(), 2);
        Ok(())
    }
}
