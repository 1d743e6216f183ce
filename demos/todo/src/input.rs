//! Line-delimited JSON action input
//!
//! One action per line, e.g. `{"type": "ADD_TODO", "id": 1, "text": "x"}`.
//! Blank lines are skipped.

use crate::types::TodoAction;
use std::io::BufRead;
use thiserror::Error;

/// Errors produced while reading actions
#[derive(Error, Debug)]
pub enum ActionInputError {
    /// The underlying reader failed
    #[error("Failed to read action input: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not a valid action
    #[error("Invalid action on line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Parse one input line
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns the JSON error if the line is not a valid action.
pub fn parse_action_line(line: &str) -> Result<Option<TodoAction>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Iterator over the actions of a line-delimited reader
///
/// Yields an error for the first unreadable or unparsable line; callers
/// are expected to stop there.
#[derive(Debug)]
pub struct ActionLines<R> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> ActionLines<R> {
    /// Read actions from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for ActionLines<R> {
    type Item = Result<TodoAction, ActionInputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(error) => return Some(Err(error.into())),
            };
            self.line += 1;

            match parse_action_line(&text) {
                Ok(Some(action)) => return Some(Ok(action)),
                Ok(None) => {
                    tracing::trace!(line = self.line, "Skipping blank line");
                },
                Err(source) => {
                    return Some(Err(ActionInputError::Parse {
                        line: self.line,
                        source,
                    }));
                },
            }
        }
    }
}
