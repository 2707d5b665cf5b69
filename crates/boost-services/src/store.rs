//! Key/value persistence backend trait and the JSON persistence shim.
//!
//! This module defines the `KeyValueStore` trait that abstracts over storage
//! implementations (files on disk, in-memory) and `Persistence`, which layers
//! JSON serialization on top of it.

use std::sync::Arc;

use boost_core::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_store::MemoryStore;

/// Storage keys used by the dashboard.
pub mod keys {
    /// JSON array of tasks, newest first.
    pub const TASKS: &str = "daily_boost_tasks";
    /// JSON string holding the last successfully queried city.
    pub const CITY: &str = "daily_boost_city";
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for raw string key/value storage backends.
///
/// Implementations must be shareable across threads; `Persistence` hands out
/// clones of an `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw text stored under `key`.
    ///
    /// Returns `None` if nothing is stored.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// JSON persistence over a `KeyValueStore`.
///
/// `try_*` methods report failures; `save` and `load` absorb them so that a
/// broken store never interrupts the dashboard.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persistence backed by a fresh `MemoryStore`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Serialize `value` to JSON and store it under `key`.
    ///
    /// # Errors
    /// Returns `StorageError::Serialization` if `value` cannot be encoded, or
    /// whatever the underlying store reports on write.
    pub fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &text)
    }

    /// Like `try_save`, but failures are logged and swallowed.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            tracing::warn!("Failed to persist {}: {}", key, e);
        }
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// # Errors
    /// Returns `StorageError::Serialization` if the stored text is not valid
    /// JSON for `T`, or whatever the underlying store reports on read.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.store.get(key)? {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            _ => Ok(None),
        }
    }

    /// Load the value under `key`, or `fallback` if it is absent or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e) => {
                tracing::debug!("Ignoring unreadable {}: {}", key, e);
                fallback
            }
        }
    }

    /// Remove the value under `key`, logging failures.
    pub fn clear(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("Failed to remove {}: {}", key, e);
        }
    }
}
