//! The raw byte-level storage capability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::CacheError;

/// A durable key-value slot provider.
///
/// Values are opaque bytes; [`crate::Cache`] layers JSON on top.
pub trait Storage: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace the bytes stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError>;

    /// Empty the slot. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Check if the slot holds a value.
    fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        (**self).write(key, bytes)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> Result<bool, CacheError> {
        (**self).contains(key)
    }
}

/// In-process storage, shared between clones.
///
/// Used as a test double and as the slot for hosts that do not need
/// persistence across restarts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write raw bytes directly, bypassing serialization.
    ///
    /// Handy for simulating another process (or a corrupted slot).
    pub fn put_raw(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), bytes.into());
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
