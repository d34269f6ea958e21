//! Quote-request domain logic for an event-rental storefront.
//!
//! A visitor collects rental products into a wishlist and submits it as a
//! request for a priced quote. This crate holds everything below the UI:
//!
//! - **Catalog**: products, promotions, effective per-day price
//! - **Wishlist**: line items and a write-through store with change notification
//! - **Quote**: payload construction and two-phase submission
//! - **Search**: listing filters, responses and the pagination window
//!
//! # Example
//!
//! ```rust,ignore
//! use rental_cache::MemoryStore;
//! use rental_commerce::prelude::*;
//!
//! let store = WishlistStore::new(MemoryStore::new());
//! store.add(&product, 2, None)?;
//!
//! let payload = QuoteBuilder::new().build(
//!     &store.snapshot(),
//!     &BuyerInfo::new("Ada", "555-0100", "ada@example.com"),
//!     &VenueInfo::new("Rose Hall"),
//!     &TimeFields::new("2024-06-01", "4", "00", "PM"),
//!     &TimeFields::new("2024-06-02", "11", "00", "AM"),
//!     tax_rate,
//! )?;
//!
//! let mut submission = QuoteSubmission::new(payload);
//! submission.submit(&api, &store, DEFAULT_SUBMIT_TIMEOUT).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod datetime;
pub mod quote;
pub mod search;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{
        base_price, effective_price, PriceField, Product, Promotion, PromotionKind,
    };

    // Dates
    pub use crate::datetime::{combine, Period, TimeFields};

    // Wishlist
    pub use crate::wishlist::{
        LineItem, Toggle, Wishlist, WishlistStore, DEFAULT_WISHLIST_KEY, MAX_QUANTITY_PER_ITEM,
    };

    // Quote
    pub use crate::quote::{
        BuyerInfo, CartDetails, QuoteBuilder, QuotePayload, QuoteSubmission, QuoteTransport,
        SubmissionLeg, SubmissionOutcome, TransportError, VenueInfo, DEFAULT_SUBMIT_TIMEOUT,
    };

    // Search
    pub use crate::search::{
        visible_page_window, PageItem, Pagination, ProductFilter, ProductPage, SortOption,
    };
}
