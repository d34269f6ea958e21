//! Catalog listing responses and pagination bookkeeping.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::search::{visible_page_window, PageItem};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of products, when the endpoint reports it.
    pub total_items: Option<u64>,
}

impl Pagination {
    /// Create pagination info. `page` is clamped into range.
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
            total_pages,
            total_items: None,
        }
    }

    pub fn with_total_items(mut self, total: u64) -> Self {
        self.total_items = Some(total);
        self
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then_some(self.page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then_some(self.page - 1)
    }

    /// Page slots for a pagination control.
    pub fn window(&self, window_size: usize) -> Vec<PageItem> {
        visible_page_window(self.page, self.total_pages, window_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// A page of products from `/web/main/all-products` or
/// `/web/products/discount`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total_pages: u32,
    /// Only reported by the full listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_products: Option<u64>,
}

impl ProductPage {
    /// Pagination for this page, given the page that was requested.
    pub fn pagination(&self, requested_page: u32) -> Pagination {
        let pagination = Pagination::new(requested_page, self.total_pages);
        match self.total_products {
            Some(total) => pagination.with_total_items(total),
            None => pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(1, 3);
        assert!(!p.has_prev());
        assert!(p.has_next());
        assert_eq!(p.next_page(), Some(2));

        let p = Pagination::new(9, 3);
        assert_eq!(p.page, 3);
        assert!(!p.has_next());
        assert_eq!(p.prev_page(), Some(2));
    }

    #[test]
    fn test_empty_listing() {
        let p = Pagination::default();
        assert!(!p.has_next());
        assert!(p.window(5).is_empty());
    }

    #[test]
    fn test_product_page_from_json() {
        let json = r#"{
            "products": [{"_id": "a", "title": "Bistro Lights", "perDayPricing": 35}],
            "totalPages": 20,
            "totalProducts": 231
        }"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();
        let pagination = page.pagination(5);
        assert_eq!(pagination.total_items, Some(231));
        assert_eq!(pagination.window(5).len(), 7);
    }

    #[test]
    fn test_discount_page_without_total() {
        let page: ProductPage = serde_json::from_str(r#"{"products": [], "totalPages": 1}"#).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.pagination(1).total_items, None);
    }
}
