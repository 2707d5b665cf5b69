//! Task types and the render projection of a task list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary shown when the list has no tasks.
pub const EMPTY_TASKS_MESSAGE: &str = "No tasks yet. Add your first task!";

/// A single to-do entry.
///
/// Persisted as `{"id": "...", "text": "...", "done": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque id, unique within the list. Derived from creation time.
    pub id: String,
    /// Trimmed, non-empty text.
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Build a new open task. The caller guarantees `text` is already trimmed.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            done: false,
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    pub id: String,
    pub text: String,
    pub done: bool,
}

impl fmt::Display for TaskLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.done { 'x' } else { ' ' };
        write!(f, "[{}] {}  ({})", mark, self.text, self.id)
    }
}

/// Pure projection of a task list: rows plus the summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub lines: Vec<TaskLine>,
    pub summary: String,
}

impl TaskView {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let lines = tasks
            .iter()
            .map(|t| TaskLine {
                id: t.id.clone(),
                text: t.text.clone(),
                done: t.done,
            })
            .collect();

        Self {
            lines,
            summary: summary(tasks),
        }
    }
}

/// `"{completed}/{total} completed"`, or the empty-list placeholder.
pub fn summary(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return EMPTY_TASKS_MESSAGE.to_string();
    }
    let completed = tasks.iter().filter(|t| t.done).count();
    format!("{}/{} completed", completed, tasks.len())
}
