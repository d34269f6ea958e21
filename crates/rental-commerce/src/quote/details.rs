//! Flattened cart summary sent to `/api/sent-cart-details`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, SetCode};
use crate::money::Money;
use crate::quote::{BuyerInfo, QuotePayload, VenueInfo};

/// Denormalized view of a quote for notification emails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartDetails {
    #[serde(flatten)]
    pub buyer: BuyerInfo,
    #[serde(flatten)]
    pub venue: VenueInfo,
    pub set_code: SetCode,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub products: Vec<CartDetailsRow>,
    pub tax: f64,
    pub total_price: Money,
}

/// One product line of [`CartDetails`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartDetailsRow {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub effective_price: Money,
    pub product_total: Money,
}

impl CartDetails {
    /// Summarize a payload. Pure projection, nothing is recomputed.
    pub fn from_payload(payload: &QuotePayload) -> Self {
        let products = payload
            .products()
            .map(|p| CartDetailsRow {
                product_id: p.product.id.clone(),
                title: p.product.title.clone(),
                quantity: p.quantity,
                effective_price: p.effective_price,
                product_total: p.product_total,
            })
            .collect();

        Self {
            buyer: payload.buyer.clone(),
            venue: payload.venue.clone(),
            set_code: payload
                .set_code()
                .cloned()
                .unwrap_or_else(|| SetCode::new("")),
            start_date: payload.start_date,
            end_date: payload.end_date,
            products,
            tax: payload.products().map(|p| p.tax).next().unwrap_or(0.0),
            total_price: payload.total_price,
        }
    }
}
