//! Per-day price calculation.

use crate::catalog::{PriceField, Product, PromotionKind};
use crate::error::CommerceError;
use crate::money::Money;

/// The product's base per-day price.
///
/// Missing, non-numeric, non-finite or negative prices are rejected rather
/// than coerced to zero.
pub fn base_price(product: &Product) -> Result<Money, CommerceError> {
    let field = product
        .per_day_pricing
        .as_ref()
        .ok_or_else(|| invalid(product, "missing per-day price"))?;
    let amount = non_negative(product, field, "per-day price")?;
    Money::from_decimal(amount).ok_or_else(|| invalid(product, "per-day price out of range"))
}

/// The per-unit price after any active promotion.
///
/// - no promotion, or an inactive one: the base price
/// - `flat`: base minus the amount, floored at zero
/// - `percent`: base scaled by `1 - value/100`, rounded to the cent and
///   floored at zero
pub fn effective_price(product: &Product) -> Result<Money, CommerceError> {
    let base = base_price(product)?;

    let Some(promotion) = product.promotion.as_ref().filter(|p| p.active) else {
        return Ok(base);
    };

    let field = promotion
        .value
        .as_ref()
        .ok_or_else(|| invalid(product, "active promotion has no value"))?;
    let value = non_negative(product, field, "promotion value")?;

    let price = match promotion.kind {
        PromotionKind::Flat => {
            let off = Money::from_decimal(value)
                .ok_or_else(|| invalid(product, "promotion value out of range"))?;
            base.saturating_sub(off)
        }
        PromotionKind::Percent => base.scale(1.0 - value / 100.0),
    };

    Ok(price)
}

fn non_negative(product: &Product, field: &PriceField, what: &str) -> Result<f64, CommerceError> {
    match field.value() {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(v) if v.is_finite() => Err(invalid(product, &format!("negative {what}: {v}"))),
        _ => Err(invalid(product, &format!("non-numeric {what}: {field:?}"))),
    }
}

fn invalid(product: &Product, reason: &str) -> CommerceError {
    CommerceError::InvalidPrice {
        product_id: product.id.to_string(),
        reason: reason.to_string(),
    }
}
