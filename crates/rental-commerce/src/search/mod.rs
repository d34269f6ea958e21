//! Search module.
//!
//! Contains catalog filters, listing responses and the pagination window.

mod filter;
mod pagination;
mod results;

pub use filter::{ProductFilter, SortOption};
pub use pagination::{visible_page_window, PageItem, DEFAULT_WINDOW_SIZE};
pub use results::{Pagination, ProductPage};
