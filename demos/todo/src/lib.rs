//! # Todo Example
//!
//! A todo list demonstrating reducer composition with Reducer Kit.
//!
//! This example showcases:
//! - An item reducer (`todo`) reused by a list reducer (`todos`)
//! - Combining the list and the visibility filter into one root state
//! - The same root built by string key with `CombinedReducer`
//! - Reading line-delimited JSON actions
//!
//! ## Example
//!
//! ```
//! use reducer_kit_runtime::Store;
//! use todo::{visible_todos, TodoAction, TodoAppReducer, VisibilityFilter};
//!
//! let mut store = Store::new(TodoAppReducer::default());
//!
//! store.dispatch(TodoAction::AddTodo { id: 1, text: "Buy milk".to_string() });
//! store.dispatch(TodoAction::AddTodo { id: 2, text: "Write docs".to_string() });
//! store.dispatch(TodoAction::ToggleTodo { id: 1 });
//! store.dispatch(TodoAction::SetVisibilityFilter { filter: VisibilityFilter::ShowActive });
//!
//! let visible = visible_todos(store.state());
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].text, "Write docs");
//! ```

pub mod input;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use input::{ActionInputError, ActionLines};
pub use reducer::{
    keyed_todo_app, todo, visible_todos, TodoAppReducer, TodoAppState, Todos, TodosReducer,
    VisibilityFilterReducer,
};
pub use types::{Todo, TodoAction, VisibilityFilter};
