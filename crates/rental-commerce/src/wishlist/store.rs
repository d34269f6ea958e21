//! Write-through wishlist store.
//!
//! Every mutation persists the new snapshot to the durable slot first,
//! then swaps it into memory, then publishes it to subscribers. A storage
//! failure leaves memory and subscribers untouched.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rental_cache::{Cache, CacheError, Storage};
use tokio::sync::watch;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::wishlist::{LineItem, Wishlist};

/// Slot key used when none is configured.
pub const DEFAULT_WISHLIST_KEY: &str = "wishlist";

/// What [`WishlistStore::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Owns the wishlist and keeps it in sync with a durable slot.
pub struct WishlistStore<S> {
    cache: Cache<S>,
    key: String,
    state: Mutex<Wishlist>,
    events: watch::Sender<Wishlist>,
}

impl<S: Storage> WishlistStore<S> {
    /// Create a store over the default slot key. Call [`load`](Self::load)
    /// to pick up persisted state.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_WISHLIST_KEY)
    }

    /// Create a store over a specific slot key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        let (events, _) = watch::channel(Wishlist::new());
        Self {
            cache: Cache::new(storage),
            key: key.into(),
            state: Mutex::new(Wishlist::new()),
            events,
        }
    }

    /// Create a store and load the persisted wishlist.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let store = Self::with_key(storage, key);
        store.load();
        store
    }

    /// The slot key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        self.cache.store()
    }

    /// Read the slot into memory.
    ///
    /// A missing or unreadable slot yields an empty wishlist.
    pub fn load(&self) -> Wishlist {
        let loaded = self.read_slot();
        let mut state = self.lock();
        *state = loaded.clone();
        self.events.send_replace(loaded.clone());
        tracing::debug!(key = %self.key, items = loaded.len(), "wishlist loaded");
        loaded
    }

    /// Re-read the slot after an external change.
    ///
    /// Publishes only when the persisted state differs from memory.
    /// Returns whether anything changed.
    pub fn sync_from_storage(&self) -> bool {
        let persisted = self.read_slot();
        let mut state = self.lock();
        if *state == persisted {
            return false;
        }
        *state = persisted.clone();
        self.events.send_replace(persisted);
        tracing::debug!(key = %self.key, "wishlist resynced from storage");
        true
    }

    /// Add a product. A product already in the wishlist is left as is.
    pub fn add(
        &self,
        product: &Product,
        quantity: u32,
        selected_date: Option<DateTime<Utc>>,
    ) -> Result<Wishlist, CommerceError> {
        self.mutate(|w| {
            if w.contains(&product.id) {
                return Ok(());
            }
            let item = LineItem::new(product.clone(), quantity, selected_date)?;
            tracing::debug!(
                product_id = %product.id,
                quantity = item.quantity,
                effective_price = %item.effective_price,
                "adding to wishlist"
            );
            w.insert(item);
            Ok(())
        })
        .map(|(w, _)| w)
    }

    /// Remove a product. Removing an absent product is not an error.
    pub fn remove(&self, product_id: &ProductId) -> Result<Wishlist, CommerceError> {
        self.mutate(|w| {
            if w.remove(product_id) {
                tracing::debug!(product_id = %product_id, "removed from wishlist");
            }
            Ok(())
        })
        .map(|(w, _)| w)
    }

    /// Remove the product if present, otherwise add one unit of it.
    pub fn toggle(&self, product: &Product) -> Result<(Wishlist, Toggle), CommerceError> {
        self.mutate(|w| {
            if w.remove(&product.id) {
                return Ok(Toggle::Removed);
            }
            w.insert(LineItem::new(product.clone(), 1, None)?);
            Ok(Toggle::Added)
        })
    }

    /// Set a line's quantity, clamped to at least 1.
    pub fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Wishlist, CommerceError> {
        self.mutate(|w| w.set_quantity(product_id, quantity))
            .map(|(w, _)| w)
    }

    /// Set or clear a line's booking date.
    pub fn set_selected_date(
        &self,
        product_id: &ProductId,
        date: Option<DateTime<Utc>>,
    ) -> Result<Wishlist, CommerceError> {
        self.mutate(|w| w.set_selected_date(product_id, date))
            .map(|(w, _)| w)
    }

    /// Empty the wishlist.
    pub fn clear(&self) -> Result<Wishlist, CommerceError> {
        self.mutate(|w| {
            w.clear();
            Ok(())
        })
        .map(|(w, _)| w)
    }

    /// Σ effective price × quantity of the current wishlist.
    pub fn total(&self) -> Money {
        self.lock().total()
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lock().contains(product_id)
    }

    /// A copy of the current wishlist.
    pub fn snapshot(&self) -> Wishlist {
        self.lock().clone()
    }

    /// Receive every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Wishlist> {
        self.events.subscribe()
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Wishlist) -> Result<R, CommerceError>,
    ) -> Result<(Wishlist, R), CommerceError> {
        let mut state = self.lock();
        let mut next = state.clone();
        let out = f(&mut next)?;

        if next != *state {
            self.cache.set(&self.key, &next)?;
            *state = next.clone();
            self.events.send_replace(next.clone());
        }

        Ok((next, out))
    }

    fn read_slot(&self) -> Wishlist {
        match self.cache.get::<Wishlist>(&self.key) {
            Ok(Some(wishlist)) => wishlist,
            Ok(None) => Wishlist::new(),
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(key = %self.key, error = %e, "wishlist slot corrupt, starting empty");
                Wishlist::new()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "wishlist slot unreadable, starting empty");
                Wishlist::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Wishlist> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Promotion;
    use rental_cache::MemoryStore;

    fn chair() -> Product {
        Product::new("chair", "Chiavari Chair", 8.0)
    }

    fn arch() -> Product {
        Product::new("arch", "Wedding Arch", 50.0).with_promotion(Promotion::percent(20.0))
    }

    #[test]
    fn test_add_persists_and_publishes() {
        let mem = MemoryStore::new();
        let store = WishlistStore::new(mem.clone());
        let rx = store.subscribe();

        store.add(&chair(), 4, None).unwrap();

        let persisted: Wishlist = Cache::new(mem).get("wishlist").unwrap().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(rx.borrow().len(), 1);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_add_existing_is_noop() {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&chair(), 4, None).unwrap();
        let w = store.add(&chair(), 9, None).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w.items()[0].quantity, 4);
    }

    #[test]
    fn test_invalid_price_leaves_state_unchanged() {
        let store = WishlistStore::new(MemoryStore::new());
        let mut broken = chair();
        broken.per_day_pricing = None;
        assert!(store.add(&broken, 1, None).is_err());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = WishlistStore::new(MemoryStore::new());
        let (w, t) = store.toggle(&arch()).unwrap();
        assert_eq!(t, Toggle::Added);
        assert_eq!(w.items()[0].quantity, 1);
        let (w, t) = store.toggle(&arch()).unwrap();
        assert_eq!(t, Toggle::Removed);
        assert!(w.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_becomes_one() {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&chair(), 5, None).unwrap();
        let w = store.set_quantity(&"chair".into(), 0).unwrap();
        assert_eq!(w.items()[0].quantity, 1);
    }

    #[test]
    fn test_set_quantity_limits() {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&chair(), 5, None).unwrap();
        assert!(matches!(
            store.set_quantity(&"chair".into(), 10_000),
            Err(CommerceError::QuantityExceedsLimit(..))
        ));
        assert!(matches!(
            store.set_quantity(&"ghost".into(), 2),
            Err(CommerceError::NotFound(_))
        ));
        assert_eq!(store.snapshot().items()[0].quantity, 5);
    }

    #[test]
    fn test_set_selected_date() {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&chair(), 1, None).unwrap();
        let when = crate::datetime::combine("2024-05-04", 4, 0, crate::datetime::Period::Pm).unwrap();
        let w = store.set_selected_date(&"chair".into(), Some(when)).unwrap();
        assert_eq!(w.items()[0].selected_date, Some(when));
    }

    #[test]
    fn test_load_missing_and_corrupt_slot() {
        let mem = MemoryStore::new();
        let store = WishlistStore::new(mem.clone());
        assert!(store.load().is_empty());

        mem.put_raw("wishlist", b"{not json".to_vec());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_drops_repeated_product() {
        let mem = MemoryStore::new();
        WishlistStore::new(mem.clone()).add(&chair(), 4, None).unwrap();

        let mut lines: serde_json::Value = Cache::new(mem.clone()).get("wishlist").unwrap().unwrap();
        let mut copy = lines[0].clone();
        copy["quantity"] = serde_json::json!(9);
        lines.as_array_mut().unwrap().push(copy);
        mem.put_raw("wishlist", serde_json::to_vec(&lines).unwrap());

        let wishlist = WishlistStore::open(mem, "wishlist").snapshot();
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.get(&"chair".into()).unwrap().quantity, 4);
    }

    #[test]
    fn test_reload_preserves_frozen_price() {
        let mem = MemoryStore::new();
        let store = WishlistStore::new(mem.clone());
        store.add(&arch(), 1, None).unwrap();

        let reopened = WishlistStore::open(mem, DEFAULT_WISHLIST_KEY);
        assert_eq!(reopened.total(), Money::new(4000));
    }

    struct ReadOnlyStore;

    impl Storage for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Ok(None)
        }

        fn write(&self, key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError(format!("{key} is read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
    }

    #[test]
    fn test_storage_failure_leaves_memory_untouched() {
        let store = WishlistStore::new(ReadOnlyStore);
        let rx = store.subscribe();

        let err = store.add(&chair(), 1, None).unwrap_err();
        assert!(matches!(err, CommerceError::Storage(_)));
        assert!(store.snapshot().is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_clear() {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&chair(), 1, None).unwrap();
        store.add(&arch(), 1, None).unwrap();
        assert!(store.clear().unwrap().is_empty());
        assert_eq!(store.total(), Money::ZERO);
    }

    #[test]
    fn test_sync_from_storage_only_publishes_on_change() {
        let mem = MemoryStore::new();
        let store = WishlistStore::new(mem.clone());
        store.add(&chair(), 1, None).unwrap();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(!store.sync_from_storage());
        assert!(!rx.has_changed().unwrap());

        let other = WishlistStore::new(mem);
        other.load();
        other.add(&arch(), 2, None).unwrap();

        assert!(store.sync_from_storage());
        assert!(rx.has_changed().unwrap());
        assert!(store.contains(&"arch".into()));
    }
}
