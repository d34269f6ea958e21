//! Quote request payload sent to `/save-payment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::SetCode;
use crate::money::Money;
use crate::quote::{BuyerInfo, VenueInfo};

/// The nested quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(flatten)]
    pub buyer: BuyerInfo,
    #[serde(flatten)]
    pub venue: VenueInfo,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Always exactly one set.
    pub set: Vec<QuoteSet>,
    /// Σ product totals.
    pub total_price: Money,
}

impl QuotePayload {
    /// The booking set.
    pub fn primary_set(&self) -> Option<&QuoteSet> {
        self.set.first()
    }

    /// The set code, used as the submission's identity.
    pub fn set_code(&self) -> Option<&SetCode> {
        self.primary_set().map(|s| &s.set_code)
    }

    /// All product rows across sets.
    pub fn products(&self) -> impl Iterator<Item = &QuoteProduct> {
        self.set.iter().flat_map(|s| s.products.iter())
    }
}

/// Venue, date range and products of one booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSet {
    pub set_code: SetCode,
    pub set_title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub products: Vec<QuoteProduct>,
}

/// A product row in a quote set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteProduct {
    /// Descriptive product fields, verbatim.
    #[serde(flatten)]
    pub product: Product,
    pub effective_price: Money,
    pub quantity: u32,
    /// Tax rate applied to the quote.
    pub tax: f64,
    /// effective price × quantity.
    pub product_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<DateTime<Utc>>,
}
