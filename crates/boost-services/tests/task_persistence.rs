//! Integration tests for TaskManager on top of the file-backed store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use boost_services::{keys, FileStore, KeyValueStore, Persistence, Task, TaskManager};

fn file_persistence(dir: &std::path::Path) -> Persistence {
    Persistence::new(Arc::new(FileStore::open(dir).unwrap()))
}

#[test]
fn test_tasks_survive_restart() {
    let tmp = tempfile::tempdir().unwrap();

    let saved = {
        let mut manager = TaskManager::load(file_persistence(tmp.path()));
        manager.add("Write report");
        manager.add("Call mom");
        manager.add("Buy milk");
        let second = manager.list().tasks()[1].id.clone();
        manager.toggle(&second, true);
        manager.list().clone()
    };

    let reloaded = TaskManager::load(file_persistence(tmp.path()));
    assert_eq!(reloaded.list(), &saved);
    assert_eq!(reloaded.list().len(), 3);
    assert_eq!(reloaded.list().tasks()[0].text, "Buy milk");
    assert!(reloaded.list().tasks()[1].done);
}

#[test]
fn test_stored_format_is_json_array() {
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = TaskManager::load(file_persistence(tmp.path()));
    let task = manager.add("  Stretch ").unwrap();

    let raw = std::fs::read_to_string(tmp.path().join("daily_boost_tasks.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([{ "id": task.id, "text": "Stretch", "done": false }])
    );
}

#[test]
fn test_corrupt_file_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();
    store.set(keys::TASKS, "[{\"id\": 1,").unwrap();

    let manager = TaskManager::load(Persistence::new(Arc::new(store)));
    assert!(manager.list().is_empty());
    assert_eq!(manager.view().summary, "No tasks yet. Add your first task!");
}

#[test]
fn test_delete_and_clear_are_persisted() {
    let tmp = tempfile::tempdir().unwrap();
    let mut manager = TaskManager::load(file_persistence(tmp.path()));
    let a = manager.add("a").unwrap();
    let b = manager.add("b").unwrap();
    let c = manager.add("c").unwrap();

    manager.toggle(&a.id, true);
    manager.toggle(&c.id, true);
    assert_eq!(manager.clear_completed(), 2);
    assert!(manager.delete(&b.id));
    assert!(!manager.delete(&b.id));

    let persistence = file_persistence(tmp.path());
    let stored: Vec<Task> = persistence.load(keys::TASKS, vec![Task::new("x", "sentinel")]);
    assert!(stored.is_empty());
}
