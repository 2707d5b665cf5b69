//! In-memory task list and the manager that persists it after every mutation.

use chrono::{DateTime, Utc};

use crate::store::{keys, Persistence};
use crate::task::{self, Task, TaskView};

/// Ordered task list, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// `(completed, total)`
    pub fn counts(&self) -> (usize, usize) {
        let completed = self.tasks.iter().filter(|t| t.done).count();
        (completed, self.tasks.len())
    }

    pub fn summary(&self) -> String {
        task::summary(&self.tasks)
    }

    pub fn view(&self) -> TaskView {
        TaskView::from_tasks(&self.tasks)
    }

    /// Add a task stamped with the current time.
    ///
    /// Returns `None` (and leaves the list alone) when `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        self.add_at(text, Utc::now())
    }

    /// Add a task whose id derives from `now`.
    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Option<&Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let id = self.next_id(now);
        self.tasks.insert(0, Task::new(id, trimmed));
        self.tasks.first()
    }

    /// Millisecond timestamp, bumped past any id already in the list.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Set `done` on the matching task. Returns whether a task matched.
    pub fn toggle(&mut self, id: &str, done: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.done = done;
                true
            }
            None => false,
        }
    }

    /// Remove the matching task. Returns whether a task was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Remove all completed tasks. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.done);
        before - self.tasks.len()
    }
}

/// Owns the task list and writes it back to storage after each mutation.
#[derive(Debug, Clone)]
pub struct TaskManager {
    list: TaskList,
    persistence: Persistence,
}

impl TaskManager {
    /// Restore the list from storage; a missing or unreadable list starts empty.
    pub fn load(persistence: Persistence) -> Self {
        let tasks: Vec<Task> = persistence.load(keys::TASKS, Vec::new());
        tracing::debug!("Loaded {} tasks", tasks.len());
        Self {
            list: TaskList::from_tasks(tasks),
            persistence,
        }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn view(&self) -> TaskView {
        self.list.view()
    }

    pub fn add(&mut self, text: &str) -> Option<Task> {
        self.add_at(text, Utc::now())
    }

    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Option<Task> {
        let task = self.list.add_at(text, now).cloned()?;
        tracing::info!("Added task {}", task.id);
        self.persist();
        Some(task)
    }

    /// Unknown ids leave the list unchanged but still persist.
    pub fn toggle(&mut self, id: &str, done: bool) -> bool {
        let found = self.list.toggle(id, done);
        if !found {
            tracing::debug!("Toggle ignored, no task {}", id);
        }
        self.persist();
        found
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.list.delete(id);
        self.persist();
        removed
    }

    /// No-op (nothing written) when no task is done.
    pub fn clear_completed(&mut self) -> usize {
        if !self.list.iter().any(|t| t.done) {
            return 0;
        }
        let removed = self.list.clear_completed();
        tracing::info!("Cleared {} completed tasks", removed);
        self.persist();
        removed
    }

    fn persist(&self) {
        self.persistence.save(keys::TASKS, self.list.tasks());
    }
}
