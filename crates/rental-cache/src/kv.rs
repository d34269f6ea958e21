//! Typed slot access with automatic JSON serialization.

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheError, Storage};

/// Type-safe cache over any [`Storage`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: Storage> Cache<S> {
    /// Wrap a storage backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying storage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist and
    /// [`CacheError::SerializeError`] if the stored bytes don't parse as `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let items: Option<Vec<LineItem>> = cache.get("wishlist")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.read(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get the raw serialized form of a slot.
    pub fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store.read(key)
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("wishlist", &items)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.write(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        quantity: u32,
    }

    #[test]
    fn test_set_then_get() {
        let cache = Cache::new(MemoryStore::new());
        let items = vec![Item {
            id: "a".to_string(),
            quantity: 2,
        }];

        cache.set("wishlist", &items).unwrap();
        let loaded: Option<Vec<Item>> = cache.get("wishlist").unwrap();
        assert_eq!(loaded, Some(items));
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = Cache::new(MemoryStore::new());
        let loaded: Option<Vec<Item>> = cache.get("wishlist").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_corrupt_is_serialize_error() {
        let store = MemoryStore::new();
        store.put_raw("wishlist", "{not json");
        let cache = Cache::new(store);

        let result: Result<Option<Vec<Item>>, _> = cache.get("wishlist");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_set_stores_plain_json_array() {
        let cache = Cache::new(MemoryStore::new());
        cache
            .set(
                "wishlist",
                &vec![Item {
                    id: "a".to_string(),
                    quantity: 1,
                }],
            )
            .unwrap();

        let raw = cache.get_raw("wishlist").unwrap().unwrap();
        assert_eq!(raw, br#"[{"id":"a","quantity":1}]"#.to_vec());
    }

    #[test]
    fn test_delete_and_exists() {
        let cache = Cache::new(MemoryStore::new());
        cache.set("k", &1u8).unwrap();
        assert!(cache.exists("k").unwrap());
        cache.delete("k").unwrap();
        assert!(!cache.exists("k").unwrap());
    }
}
