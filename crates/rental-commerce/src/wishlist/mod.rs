//! Wishlist module.
//!
//! Contains the line item and wishlist types and the write-through store.

mod line_item;
mod store;
mod wishlist;

pub use line_item::{LineItem, MAX_QUANTITY_PER_ITEM};
pub use store::{Toggle, WishlistStore, DEFAULT_WISHLIST_KEY};
pub use wishlist::Wishlist;
