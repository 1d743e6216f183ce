//! Domain types for the todo list

use serde::{Deserialize, Serialize};

/// A single todo entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Caller-assigned identifier
    pub id: u64,
    /// What needs doing
    pub text: String,
    /// Whether the todo has been done
    pub completed: bool,
}

impl Todo {
    /// Create an open todo
    #[must_use]
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }
}

/// Which todos the list shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityFilter {
    /// Every todo
    #[default]
    ShowAll,
    /// Only completed todos
    ShowCompleted,
    /// Only open todos
    ShowActive,
}

impl VisibilityFilter {
    /// Whether `todo` is visible under this filter
    #[must_use]
    pub const fn accepts(self, todo: &Todo) -> bool {
        match self {
            Self::ShowAll => true,
            Self::ShowCompleted => todo.completed,
            Self::ShowActive => !todo.completed,
        }
    }
}

/// Actions understood by the todo application
///
/// Decoded from `{"type": "...", ...}` records such as
/// `{"type": "ADD_TODO", "id": 1, "text": "x"}`. Unrecognized tags decode to
/// [`TodoAction::Unknown`], which every reducer passes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a new open todo
    AddTodo {
        /// Identifier of the new todo
        id: u64,
        /// Text of the new todo
        text: String,
    },
    /// Flip the `completed` flag of the todo with this id
    ToggleTodo {
        /// Identifier of the todo to toggle
        id: u64,
    },
    /// Change which todos are shown
    SetVisibilityFilter {
        /// The new filter
        filter: VisibilityFilter,
    },
    /// Any action meant for another reducer
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;

    #[test]
    fn test_decode_add_todo() {
        let action: TodoAction =
            serde_json::from_str(r#"{"type":"ADD_TODO","id":1,"text":"x"}"#).unwrap();
        assert_eq!(
            action,
            TodoAction::AddTodo {
                id: 1,
                text: "x".to_string()
            }
        );
    }

    #[test]
    fn test_decode_filter() {
        let action: TodoAction =
            serde_json::from_str(r#"{"type":"SET_VISIBILITY_FILTER","filter":"SHOW_ACTIVE"}"#)
                .unwrap();
        assert_eq!(
            action,
            TodoAction::SetVisibilityFilter {
                filter: VisibilityFilter::ShowActive
            }
        );
    }

    #[test]
    fn test_unrecognized_tag_decodes_to_unknown() {
        let action: TodoAction = serde_json::from_str(r#"{"type":"INCREMENT"}"#).unwrap();
        assert_eq!(action, TodoAction::Unknown);
    }

    #[test]
    fn test_missing_payload_is_an_error() {
        assert!(serde_json::from_str::<TodoAction>(r#"{"type":"TOGGLE_TODO"}"#).is_err());
    }

    #[test]
    fn test_filter_accepts() {
        let open = Todo::new(1, "open");
        let done = Todo {
            completed: true,
            ..Todo::new(2, "done")
        };

        assert!(VisibilityFilter::ShowAll.accepts(&open));
        assert!(VisibilityFilter::ShowAll.accepts(&done));
        assert!(VisibilityFilter::ShowActive.accepts(&open));
        assert!(!VisibilityFilter::ShowActive.accepts(&done));
        assert!(VisibilityFilter::ShowCompleted.accepts(&done));
        assert!(!VisibilityFilter::ShowCompleted.accepts(&open));
    }
}
