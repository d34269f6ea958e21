//! Wishlist line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{effective_price, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// One product in the wishlist.
///
/// Serialized as the product document with `quantity`, `effectivePrice`
/// and `selectedDate` merged in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product snapshot taken when the item was added.
    #[serde(flatten)]
    pub product: Product,
    /// Number of units, at least 1.
    pub quantity: u32,
    /// Per-day price captured at add-time.
    pub effective_price: Money,
    /// Requested booking date for this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<DateTime<Utc>>,
}

impl LineItem {
    /// Create a line item, stamping the current effective price.
    ///
    /// Quantities below 1 are clamped up; quantities above
    /// [`MAX_QUANTITY_PER_ITEM`] are rejected.
    pub fn new(
        product: Product,
        quantity: u32,
        selected_date: Option<DateTime<Utc>>,
    ) -> Result<Self, CommerceError> {
        let quantity = checked_quantity(quantity)?;
        let effective_price = effective_price(&product)?;
        Ok(Self {
            product,
            quantity,
            effective_price,
            selected_date,
        })
    }

    /// The product identifier.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Line total (effective price × quantity).
    pub fn total(&self) -> Money {
        self.effective_price * self.quantity
    }
}

/// Clamp to at least 1 and enforce the upper limit.
pub(crate) fn checked_quantity(quantity: u32) -> Result<u32, CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(quantity.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Promotion;

    #[test]
    fn test_new_stamps_effective_price() {
        let product = Product::new("b", "Arch", 50.0).with_promotion(Promotion::percent(20.0));
        let item = LineItem::new(product, 2, None).unwrap();
        assert_eq!(item.effective_price, Money::new(4000));
        assert_eq!(item.total(), Money::new(8000));
    }

    #[test]
    fn test_zero_quantity_clamped() {
        let item = LineItem::new(Product::new("a", "Chair", 5.0), 0, None).unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_quantity_over_limit() {
        let err = LineItem::new(Product::new("a", "Chair", 5.0), 10_000, None).unwrap_err();
        assert!(matches!(err, CommerceError::QuantityExceedsLimit(10_000, 9999)));
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let item = LineItem::new(Product::new("a", "Chair", 5.0), 3, None).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["_id"], "a");
        assert_eq!(json["title"], "Chair");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["effectivePrice"], 5.0);
        assert!(json.get("product").is_none());
        assert!(json.get("selectedDate").is_none());
    }

    #[test]
    fn test_effective_price_not_recomputed_on_load() {
        let json = r#"{"_id":"a","title":"Chair","perDayPricing":50,
            "promotion":{"active":true,"kind":"flat","value":10},
            "quantity":1,"effectivePrice":45.0}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.effective_price, Money::new(4500));
    }
}
