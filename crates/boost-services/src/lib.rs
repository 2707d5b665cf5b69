//! Local services for Daily Boost: key/value persistence and the task list.

pub mod file_store;
pub mod store;
pub mod task;
pub mod task_list;

pub use file_store::{FileStore, MemoryStore};
pub use store::{keys, KeyValueStore, Persistence};
pub use task::{Task, TaskLine, TaskView, EMPTY_TASKS_MESSAGE};
pub use task_list::{TaskList, TaskManager};
