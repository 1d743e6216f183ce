//! Reducers for the todo application
//!
//! Two leaf reducers (`todos` and `visibilityFilter`) combined into one root,
//! either statically with [`combine_reducers!`] or by key with
//! [`CombinedReducer`].

use crate::types::{Todo, TodoAction, VisibilityFilter};
use reducer_kit_core::combine_reducers;
use reducer_kit_core::composition::CombinedReducer;
use reducer_kit_core::error::CombineError;
use reducer_kit_core::reducer::Reducer;
use serde::Serialize;
use std::sync::Arc;

/// Key of the todo list branch in the keyed root
pub const TODOS_KEY: &str = "todos";

/// Key of the filter branch in the keyed root
pub const VISIBILITY_FILTER_KEY: &str = "visibilityFilter";

/// The todo list state
pub type Todos = Vec<Arc<Todo>>;

/// Reduce a single todo
///
/// Without an entry, `AddTodo` creates one and every other action yields
/// `None`. With an entry, `ToggleTodo` for its id yields a new entry with
/// `completed` flipped and every other action returns the entry itself.
#[must_use]
pub fn todo(state: Option<&Arc<Todo>>, action: &TodoAction) -> Option<Arc<Todo>> {
    match (state, action) {
        (None, TodoAction::AddTodo { id, text }) => Some(Arc::new(Todo::new(*id, text.clone()))),
        (Some(entry), TodoAction::ToggleTodo { id }) if *id == entry.id => Some(Arc::new(Todo {
            completed: !entry.completed,
            ..(**entry).clone()
        })),
        (entry, _) => entry.cloned(),
    }
}

/// Reducer for the todo list
#[derive(Debug, Clone, Copy, Default)]
pub struct TodosReducer;

impl Reducer for TodosReducer {
    type State = Todos;
    type Action = TodoAction;

    fn initial_state(&self) -> Todos {
        Vec::new()
    }

    fn reduce(&self, state: &Arc<Todos>, action: &TodoAction) -> Arc<Todos> {
        match action {
            TodoAction::AddTodo { .. } => {
                let mut next = Vec::with_capacity(state.len() + 1);
                next.extend(state.iter().cloned());
                next.extend(todo(None, action));
                Arc::new(next)
            },
            TodoAction::ToggleTodo { id } => {
                if !state.iter().any(|entry| entry.id == *id) {
                    tracing::trace!(id, "No todo to toggle");
                    return Arc::clone(state);
                }
                Arc::new(
                    state
                        .iter()
                        .filter_map(|entry| todo(Some(entry), action))
                        .collect(),
                )
            },
            TodoAction::SetVisibilityFilter { .. } | TodoAction::Unknown => Arc::clone(state),
        }
    }
}

/// Reducer for the visibility filter
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityFilterReducer;

impl Reducer for VisibilityFilterReducer {
    type State = VisibilityFilter;
    type Action = TodoAction;

    fn initial_state(&self) -> VisibilityFilter {
        VisibilityFilter::default()
    }

    fn reduce(&self, state: &Arc<VisibilityFilter>, action: &TodoAction) -> Arc<VisibilityFilter> {
        match action {
            TodoAction::SetVisibilityFilter { filter } if *filter != **state => Arc::new(*filter),
            _ => Arc::clone(state),
        }
    }
}

combine_reducers! {
    /// Root reducer of the todo application
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TodoAppReducer;

    /// Root state of the todo application
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TodoAppState;

    action: TodoAction;

    fields {
        todos: TodosReducer,
        visibility_filter: VisibilityFilterReducer,
    }
}

/// The same application root, combined by string key
///
/// Branches are stored under [`TODOS_KEY`] and [`VISIBILITY_FILTER_KEY`].
///
/// # Errors
///
/// Returns [`CombineError::DuplicateKey`] if a key is registered twice.
pub fn keyed_todo_app() -> Result<CombinedReducer<TodoAction>, CombineError> {
    CombinedReducer::new()
        .with(TODOS_KEY, TodosReducer)?
        .with(VISIBILITY_FILTER_KEY, VisibilityFilterReducer)
}

/// Todos visible under the current filter, in insertion order
#[must_use]
pub fn visible_todos(state: &TodoAppState) -> Vec<Arc<Todo>> {
    state
        .todos
        .iter()
        .filter(|entry| state.visibility_filter.accepts(entry))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use reducer_kit_testing::{assertions, properties, ReducerTest};

    fn add(id: u64, text: &str) -> TodoAction {
        TodoAction::AddTodo {
            id,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_add_todo_on_empty_list() {
        ReducerTest::new(TodosReducer)
            .when_action(add(1, "x"))
            .then_state(|todos| {
                assert_eq!(todos.len(), 1);
                assert_eq!(*todos[0], Todo::new(1, "x"));
            })
            .then_transition(assertions::assert_changed)
            .run();
    }

    #[test]
    fn test_toggle_marks_completed_and_keeps_others() {
        let list = TodosReducer.reduce(&Arc::new(Vec::new()), &add(1, "x"));
        let list = TodosReducer.reduce(&list, &add(2, "y"));
        let before = Arc::clone(&list);

        let after = TodosReducer.reduce(&list, &TodoAction::ToggleTodo { id: 1 });

        assert_eq!(
            *after[0],
            Todo {
                completed: true,
                ..Todo::new(1, "x")
            }
        );
        assert!(!Arc::ptr_eq(&after[0], &before[0]));
        assert!(Arc::ptr_eq(&after[1], &before[1]));
        assert!(!before[0].completed);
    }

    #[test]
    fn test_toggle_twice_reopens() {
        ReducerTest::new(TodosReducer)
            .given_state(vec![Arc::new(Todo::new(7, "walk"))])
            .when_action(TodoAction::ToggleTodo { id: 7 })
            .when_action(TodoAction::ToggleTodo { id: 7 })
            .then_state(|todos| assert!(!todos[0].completed))
            .then_transition(assertions::assert_changed)
            .then_transition(assertions::assert_same_value)
            .run();
    }

    #[test]
    fn test_toggle_unknown_id_passes_through() {
        ReducerTest::new(TodosReducer)
            .given_state(vec![Arc::new(Todo::new(1, "x"))])
            .when_action(TodoAction::ToggleTodo { id: 99 })
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_item_reducer_ignores_other_ids() {
        let entry = Arc::new(Todo::new(1, "x"));
        let next = todo(Some(&entry), &TodoAction::ToggleTodo { id: 2 }).unwrap();
        assert!(Arc::ptr_eq(&entry, &next));
    }

    #[test]
    fn test_item_reducer_creates_entry_from_add() {
        assert_eq!(todo(None, &add(3, "new")).as_deref(), Some(&Todo::new(3, "new")));
        assert!(todo(None, &TodoAction::ToggleTodo { id: 3 }).is_none());
        assert!(todo(None, &TodoAction::Unknown).is_none());
    }

    #[test]
    fn test_item_reducer_ignores_add_for_existing_entry() {
        let entry = Arc::new(Todo::new(1, "x"));
        let next = todo(Some(&entry), &add(1, "y")).unwrap();
        assert!(Arc::ptr_eq(&entry, &next));
    }

    #[test]
    fn test_leaf_reducers_pass_unknown_through() {
        properties::assert_passthrough(
            &TodosReducer,
            &Arc::new(vec![Arc::new(Todo::new(1, "x"))]),
            &TodoAction::Unknown,
        );
        properties::assert_passthrough(
            &VisibilityFilterReducer,
            &Arc::new(VisibilityFilter::ShowActive),
            &TodoAction::Unknown,
        );
    }

    #[test]
    fn test_set_same_filter_passes_through() {
        ReducerTest::new(VisibilityFilterReducer)
            .when_action(TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowAll,
            })
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_set_filter() {
        ReducerTest::new(VisibilityFilterReducer)
            .when_action(TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowCompleted,
            })
            .then_state(|filter| assert_eq!(*filter, VisibilityFilter::ShowCompleted))
            .run();
    }

    #[test]
    fn test_app_reducer_routes_to_branches() {
        let reducer = TodoAppReducer::default();
        let initial = Arc::new(reducer.initial_state());

        let added = reducer.reduce(&initial, &add(1, "x"));
        assert_eq!(added.changed_fields(&initial), vec!["todos"]);

        let filtered = reducer.reduce(
            &added,
            &TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowActive,
            },
        );
        assert_eq!(filtered.changed_fields(&added), vec!["visibility_filter"]);
        assert!(initial.todos.is_empty());
    }

    #[test]
    fn test_app_state_serializes_with_camel_case_keys() {
        let reducer = TodoAppReducer::default();
        let state = reducer.reduce(&Arc::new(reducer.initial_state()), &add(1, "x"));

        let json = serde_json::to_value(&*state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "todos": [{"id": 1, "text": "x", "completed": false}],
                "visibilityFilter": "SHOW_ALL"
            })
        );
    }

    #[test]
    fn test_keyed_app_matches_typed_app() {
        let keyed = keyed_todo_app().unwrap();
        let typed = TodoAppReducer::default();

        let actions = [
            add(1, "x"),
            add(2, "y"),
            TodoAction::ToggleTodo { id: 2 },
            TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowCompleted,
            },
            TodoAction::Unknown,
        ];

        let mut keyed_state = Arc::new(keyed.initial_state());
        let mut typed_state = Arc::new(typed.initial_state());
        for action in &actions {
            keyed_state = keyed.reduce(&keyed_state, action);
            typed_state = typed.reduce(&typed_state, action);
        }

        let todos: Arc<Todos> = keyed_state.try_get(TODOS_KEY).unwrap();
        let filter: Arc<VisibilityFilter> = keyed_state.try_get(VISIBILITY_FILTER_KEY).unwrap();
        assert_eq!(*todos, *typed_state.todos);
        assert_eq!(*filter, *typed_state.visibility_filter);
    }

    #[test]
    fn test_visible_todos() {
        let reducer = TodoAppReducer::default();
        let mut state = Arc::new(reducer.initial_state());
        for action in [
            add(1, "x"),
            add(2, "y"),
            TodoAction::ToggleTodo { id: 1 },
            TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowActive,
            },
        ] {
            state = reducer.reduce(&state, &action);
        }

        let ids: Vec<u64> = visible_todos(&state).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
