//! Visible page window for pagination controls.

use serde::{Serialize, Serializer};
use std::fmt;

/// Default number of slots in the window.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// One slot of a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageItem {
    /// A clickable page number (1-indexed).
    Page(u32),
    /// A gap of one or more hidden pages.
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{n}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u32(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Pages to show around `current` out of `total`.
///
/// The first and last pages are always shown. Between them sit
/// `window_size - 2` pages centred on `current`, shifted to stay inside the
/// range, with an ellipsis wherever pages are hidden. `current` is clamped
/// into `1..=total`; windows smaller than 3 are widened to 3.
///
/// ```
/// use rental_commerce::search::{visible_page_window, PageItem::*};
/// assert_eq!(
///     visible_page_window(5, 20, 5),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(20)],
/// );
/// ```
pub fn visible_page_window(current: u32, total: u32, window_size: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let window = window_size.max(3);
    if total as usize <= window {
        return (1..=total).map(PageItem::Page).collect();
    }

    // Widened to u64 so windows near u32::MAX cannot overflow.
    let current = u64::from(current.clamp(1, total));
    let middle = (window - 2) as u64;
    let last_inner = u64::from(total) - 1;

    let mut start = current.saturating_sub(middle / 2).max(2);
    let mut end = start + middle - 1;
    if end > last_inner {
        end = last_inner;
        start = (end + 1 - middle).max(2);
    }

    let mut items = Vec::with_capacity(window + 2);
    items.push(PageItem::Page(1));
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    // Both bounds lie inside 2..total here.
    items.extend((start..=end).map(|n| PageItem::Page(n as u32)));
    if end < last_inner {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn test_small_total_lists_all() {
        assert_eq!(visible_page_window(1, 3, 5), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(visible_page_window(2, 5, 5).len(), 5);
    }

    #[test]
    fn test_last_pages_near_u32_max() {
        let max = u32::MAX;
        assert_eq!(
            visible_page_window(max, max, 5),
            vec![Page(1), Ellipsis, Page(max - 3), Page(max - 2), Page(max - 1), Page(max)]
        );
        assert_eq!(
            visible_page_window(max - 1, max, DEFAULT_WINDOW_SIZE),
            vec![Page(1), Ellipsis, Page(max - 3), Page(max - 2), Page(max - 1), Page(max)]
        );
        assert_eq!(
            visible_page_window(1, max, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(max)]
        );
    }

    #[test]
    fn test_middle_window() {
        assert_eq!(
            visible_page_window(5, 20, 5),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_window_at_edges() {
        assert_eq!(
            visible_page_window(1, 20, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(20)]
        );
        assert_eq!(
            visible_page_window(20, 20, 5),
            vec![Page(1), Ellipsis, Page(17), Page(18), Page(19), Page(20)]
        );
        assert_eq!(
            visible_page_window(3, 20, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_current_clamped() {
        assert_eq!(visible_page_window(0, 20, 5), visible_page_window(1, 20, 5));
        assert_eq!(visible_page_window(99, 20, 5), visible_page_window(20, 20, 5));
    }

    #[test]
    fn test_zero_total_is_empty() {
        assert!(visible_page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_tiny_window_widened() {
        assert_eq!(
            visible_page_window(5, 9, 1),
            vec![Page(1), Ellipsis, Page(5), Ellipsis, Page(9)]
        );
    }

    #[test]
    fn test_always_first_and_last() {
        for total in 1..=30 {
            for current in 1..=total {
                let items = visible_page_window(current, total, 5);
                assert_eq!(items.first(), Some(&Page(1)));
                assert_eq!(items.last(), Some(&Page(total)));
                assert!(items.contains(&Page(current)));
                assert!(items.windows(2).all(|w| !(w[0] == Ellipsis && w[1] == Ellipsis)));
            }
        }
    }

    #[test]
    fn test_serializes_ellipsis_as_string() {
        let json = serde_json::to_string(&visible_page_window(5, 20, 5)).unwrap();
        assert_eq!(json, r#"[1,"...",4,5,6,"...",20]"#);
    }
}
