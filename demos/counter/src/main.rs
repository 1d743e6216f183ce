//! Counter example binary
//!
//! Demonstrates the Reducer Kit store with a simple counter.

use counter::{CounterAction, CounterReducer};
use reducer_kit_runtime::{Store, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,reducer_kit_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    println!("=== Counter Example: Reducer Kit ===\n");

    let mut store = Store::with_config(
        CounterReducer::new(),
        StoreConfig::default().with_name("counter"),
    );

    println!("Initial count: {}", store.state().count);

    let _subscription = store.subscribe(|state| {
        println!("Count is now: {}", state.count);
    });

    let script = [
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Decrement,
        CounterAction::Unknown,
    ];

    for action in script {
        println!("\n>>> Dispatching: {action:?}");
        store.dispatch(action);
    }

    tracing::info!(dispatches = store.dispatch_count(), "Script finished");

    println!("\nFinal count: {}", store.state().count);
}
