//! End-to-end wishlist and quote scenarios against an in-memory slot and a
//! recording transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rental_cache::{Cache, FileStore, MemoryStore};
use rental_commerce::prelude::*;

#[derive(Default)]
struct RecordingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteTransport for RecordingTransport {
    async fn save_payment(&self, _payload: &QuotePayload) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_cart_details(&self, _details: &CartDetails) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn product_a() -> Product {
    Product::new("prod-a", "Farmhouse Table", 100.0)
}

fn product_b() -> Product {
    Product::new("prod-b", "Floral Arch", 50.0).with_promotion(Promotion::percent(20.0))
}

fn buyer() -> BuyerInfo {
    BuyerInfo::new("Grace Hopper", "555-0199", "grace@example.com")
}

fn venue() -> VenueInfo {
    VenueInfo::new("Harbor Loft").with_address("9 Pier Rd", "Boston", "MA", "02110")
}

#[test]
fn test_two_line_total_is_240() {
    let store = WishlistStore::new(MemoryStore::new());
    store.add(&product_a(), 2, None).unwrap();
    store.add(&product_b(), 1, None).unwrap();

    assert_eq!(store.total(), Money::new(24000));
}

#[test]
fn test_end_before_start_fails_without_network() {
    let store = WishlistStore::new(MemoryStore::new());
    store.add(&product_a(), 1, None).unwrap();

    let err = QuoteBuilder::new()
        .build(
            &store.snapshot(),
            &buyer(),
            &venue(),
            &TimeFields::new("2024-07-04", "6", "00", "PM"),
            &TimeFields::new("2024-07-04", "5", "00", "PM"),
            6.25,
        )
        .unwrap_err();

    assert_eq!(err.field(), Some("endDate"));
    assert!(!err.is_retryable());
}

#[test]
fn test_save_of_load_is_idempotent() {
    let mem = MemoryStore::new();
    let store = WishlistStore::new(mem.clone());
    store.add(&product_a(), 2, None).unwrap();
    store.add(&product_b(), 3, None).unwrap();

    let cache = Cache::new(mem.clone());
    let first = cache.get_raw(DEFAULT_WISHLIST_KEY).unwrap().unwrap();

    let loaded = WishlistStore::open(mem.clone(), DEFAULT_WISHLIST_KEY).snapshot();
    cache.set(DEFAULT_WISHLIST_KEY, &loaded).unwrap();
    let second = cache.get_raw(DEFAULT_WISHLIST_KEY).unwrap().unwrap();

    let reloaded = WishlistStore::open(mem, DEFAULT_WISHLIST_KEY).snapshot();
    cache.set(DEFAULT_WISHLIST_KEY, &reloaded).unwrap();
    let third = cache.get_raw(DEFAULT_WISHLIST_KEY).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let store = WishlistStore::new(MemoryStore::new());
    store.add(&product_a(), 1, None).unwrap();
    let before = store.snapshot();

    let after = store.remove(&ProductId::new("missing")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_subscribers_see_each_mutation() {
    let store = WishlistStore::new(MemoryStore::new());
    let mut rx = store.subscribe();

    store.add(&product_a(), 1, None).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 1);

    store.set_quantity(&ProductId::new("prod-a"), 4).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().items()[0].quantity, 4);

    store.remove(&ProductId::new("prod-a")).unwrap();
    assert!(rx.borrow_and_update().is_empty());
}

#[test]
fn test_file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store = WishlistStore::new(FileStore::open(dir.path()).unwrap());
    store.add(&product_b(), 2, None).unwrap();

    let reopened = WishlistStore::open(FileStore::open(dir.path()).unwrap(), DEFAULT_WISHLIST_KEY);
    assert_eq!(reopened.total(), Money::new(8000));
}

#[test]
fn test_store_is_shareable_across_threads() {
    let store = Arc::new(WishlistStore::new(MemoryStore::new()));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                let p = Product::new(format!("p{i}"), format!("Item {i}"), 1.0);
                store.add(&p, 1, None).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(store.snapshot().len(), 8);
    let persisted: Wishlist = Cache::new(store.storage().clone())
        .get(DEFAULT_WISHLIST_KEY)
        .unwrap()
        .unwrap();
    assert_eq!(persisted.len(), 8);
}

#[tokio::test]
async fn test_full_submission_clears_wishlist() {
    let store = WishlistStore::new(MemoryStore::new());
    store.add(&product_a(), 2, None).unwrap();
    store.add(&product_b(), 1, None).unwrap();

    let payload = QuoteBuilder::new()
        .build(
            &store.snapshot(),
            &buyer(),
            &venue(),
            &TimeFields::new("2024-07-04", "10", "00", "AM"),
            &TimeFields::new("2024-07-05", "2", "00", "AM"),
            6.25,
        )
        .unwrap();
    assert_eq!(payload.total_price, Money::new(24000));

    let transport = RecordingTransport::default();
    let mut submission = QuoteSubmission::new(payload);
    let outcome = submission
        .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert!(outcome.wishlist_cleared);
    assert!(store.snapshot().is_empty());
    let persisted: Wishlist = Cache::new(store.storage().clone())
        .get(DEFAULT_WISHLIST_KEY)
        .unwrap()
        .unwrap();
    assert!(persisted.is_empty());
}

#[test]
fn test_pagination_examples() {
    use PageItem::{Ellipsis, Page};

    assert_eq!(visible_page_window(1, 3, 5), vec![Page(1), Page(2), Page(3)]);
    assert_eq!(
        visible_page_window(5, 20, 5),
        vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(20)]
    );
}

#[test]
fn test_combine_examples() {
    let at = |s: &str| s.parse::<chrono::DateTime<chrono::Utc>>().unwrap();
    assert_eq!(combine("2024-03-10", 12, 0, Period::Am).unwrap(), at("2024-03-10T00:00:00Z"));
    assert_eq!(combine("2024-03-10", 12, 0, Period::Pm).unwrap(), at("2024-03-10T12:00:00Z"));
    assert_eq!(combine("2024-03-10", 1, 30, Period::Pm).unwrap(), at("2024-03-10T13:30:00Z"));
}
