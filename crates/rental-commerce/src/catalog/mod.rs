//! Product catalog module.
//!
//! Contains the product and promotion types plus per-day price calculation.

mod pricing;
mod product;

pub use pricing::{base_price, effective_price};
pub use product::{PriceField, Product, Promotion, PromotionKind};
