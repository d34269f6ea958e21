//! Durable key-value slots for the rental quote core.
//!
//! The wishlist and any pending quote submission live in a single named slot
//! each. A slot is reached through the [`Storage`] capability, which is
//! injected wherever persistence is needed so tests can swap in
//! [`MemoryStore`] and hosts can pick [`FileStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rental_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".quote")?);
//!
//! cache.set("wishlist", &items)?;
//! let items: Option<Vec<Item>> = cache.get("wishlist")?;
//! cache.delete("wishlist")?;
//! ```

mod error;
mod file;
mod kv;
mod storage;

pub use error::CacheError;
pub use file::{is_valid_key, FileStore};
pub use kv::Cache;
pub use storage::{MemoryStore, Storage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, MemoryStore, Storage};
}
