//! Todo example binary
//!
//! Reads JSON actions, one per line, from the file named by the first
//! argument or from stdin, and prints the visible todos after each dispatch.
//!
//! ```text
//! echo '{"type":"ADD_TODO","id":1,"text":"Buy milk"}' | todo
//! ```

use anyhow::Context;
use reducer_kit_runtime::{Store, StoreConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use todo::{visible_todos, ActionLines, TodoAppReducer, TodoAppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn render(state: &TodoAppState) -> String {
    let mut out = format!("[{:?}]", state.visibility_filter);
    for entry in visible_todos(state) {
        let mark = if entry.completed { 'x' } else { ' ' };
        out.push_str(&format!("\n  [{mark}] #{} {}", entry.id, entry.text));
    }
    out
}

fn open_input() -> anyhow::Result<Box<dyn BufRead>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("Failed to open {path}"))?;
            Ok(Box::new(BufReader::new(file)))
        },
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the rendered list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,reducer_kit_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut store = Store::with_config(
        TodoAppReducer::default(),
        StoreConfig::default().with_name("todo"),
    );

    let _subscription = store.subscribe(|state| println!("{}", render(state)));

    for action in ActionLines::new(open_input()?) {
        let action = action.context("Failed to read actions")?;
        store.dispatch(action);
    }

    tracing::info!(dispatches = store.dispatch_count(), "Input exhausted");

    let dump = serde_json::to_string_pretty(&**store.state()).context("Failed to encode state")?;
    println!("{dump}");

    Ok(())
}
