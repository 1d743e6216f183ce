//! # Counter Example
//!
//! A click counter demonstrating the Reducer Kit store.
//!
//! This example showcases:
//! - A leaf reducer with a passthrough for actions it does not know
//! - Actions decoded from `{"type": "..."}` records
//! - Store dispatch and subscription
//!
//! ## Example
//!
//! ```
//! use counter::{CounterAction, CounterReducer};
//! use reducer_kit_runtime::Store;
//!
//! let mut store = Store::new(CounterReducer::new());
//!
//! store.dispatch(CounterAction::Increment);
//! assert_eq!(store.state().count, 1);
//! ```

use reducer_kit_core::reducer::Reducer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Counter state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
}

/// Counter actions
///
/// Serialized with a `type` tag, e.g. `{"type": "INCREMENT"}`. Any tag the
/// counter does not know decodes to [`CounterAction::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Any action meant for another reducer
    #[serde(other)]
    Unknown,
}

/// Counter reducer
///
/// Pure function of (count, action). Unknown actions return the current
/// state unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl CounterReducer {
    /// Create a new counter reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CounterReducer {
    type State = CounterState;
    type Action = CounterAction;

    fn initial_state(&self) -> CounterState {
        CounterState::default()
    }

    fn reduce(&self, state: &Arc<CounterState>, action: &CounterAction) -> Arc<CounterState> {
        match action {
            CounterAction::Increment => Arc::new(CounterState {
                count: state.count.wrapping_add(1),
            }),
            CounterAction::Decrement => Arc::new(CounterState {
                count: state.count.wrapping_sub(1),
            }),
            CounterAction::Unknown => Arc::clone(state),
        }
    }
}
