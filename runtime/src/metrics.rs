//! Metric names recorded by the Store.
//!
//! The store records through the [`metrics`] facade only. Installing a
//! recorder (Prometheus, statsd, an in-memory recorder in tests) is left to
//! the application; without one every recording is a no-op.
//!
//! # Example
//!
//! ```
//! use reducer_kit_runtime::metrics;
//!
//! // Attach descriptions once, after installing a recorder.
//! metrics::register_metrics();
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Total number of actions dispatched
pub const DISPATCH_TOTAL: &str = "store.dispatch.total";

/// Dispatches whose root reducer returned a new state allocation
pub const STATE_CHANGES_TOTAL: &str = "store.state.changes.total";

/// Time spent inside the root reducer per dispatch
pub const REDUCER_DURATION_SECONDS: &str = "store.reducer.duration_seconds";

/// Listener invocations performed after dispatches
pub const LISTENERS_NOTIFIED_TOTAL: &str = "store.listeners.notified.total";

/// Currently registered listeners
pub const SUBSCRIPTIONS_ACTIVE: &str = "store.subscriptions.active";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of actions dispatched to stores");
    describe_counter!(
        STATE_CHANGES_TOTAL,
        "Number of dispatches that produced a new root state"
    );
    describe_histogram!(
        REDUCER_DURATION_SECONDS,
        Unit::Seconds,
        "Time taken to run the root reducer"
    );
    describe_counter!(
        LISTENERS_NOTIFIED_TOTAL,
        "Total number of listener invocations after dispatch"
    );
    describe_gauge!(
        SUBSCRIPTIONS_ACTIVE,
        "Number of listeners currently subscribed"
    );
}
