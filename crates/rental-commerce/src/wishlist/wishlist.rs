//! The wishlist collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::wishlist::line_item::{checked_quantity, LineItem};

/// Ordered line items, at most one per product.
///
/// Persisted as a bare JSON array. Loading keeps the first line of any
/// repeated product id.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<LineItem>,
}

impl<'de> Deserialize<'de> for Wishlist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

impl FromIterator<LineItem> for Wishlist {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        let mut wishlist = Wishlist::new();
        for item in iter {
            wishlist.insert(item);
        }
        wishlist
    }
}

impl Wishlist {
    /// Create an empty wishlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line by product id.
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ effective price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Append a line unless its product is already present.
    ///
    /// Returns whether the line was added.
    pub fn insert(&mut self, item: LineItem) -> bool {
        if self.contains(item.product_id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        self.items.len() < len_before
    }

    /// Set a line's quantity, clamped to at least 1.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CommerceError> {
        let quantity = checked_quantity(quantity)?;
        self.line_mut(product_id)?.quantity = quantity;
        Ok(())
    }

    /// Set or clear a line's booking date.
    pub fn set_selected_date(
        &mut self,
        product_id: &ProductId,
        date: Option<DateTime<Utc>>,
    ) -> Result<(), CommerceError> {
        self.line_mut(product_id)?.selected_date = date;
        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Result<&mut LineItem, CommerceError> {
        self.items
            .iter_mut()
            .find(|i| i.product_id() == product_id)
            .ok_or_else(|| CommerceError::NotFound(product_id.to_string()))
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
