//! Quote payload construction.

use chrono::{DateTime, Utc};

use crate::datetime::TimeFields;
use crate::error::CommerceError;
use crate::ids::SetCode;
use crate::money::Money;
use crate::quote::{BuyerInfo, QuotePayload, QuoteProduct, QuoteSet, VenueInfo};
use crate::wishlist::Wishlist;

/// Builds a [`QuotePayload`] from the wishlist and the quote form.
///
/// Pure: validation and assembly only, no I/O.
///
/// # Example
///
/// ```rust,ignore
/// let payload = QuoteBuilder::new().build(
///     &store.snapshot(),
///     &BuyerInfo::new("Ada", "555-0100", "ada@example.com"),
///     &VenueInfo::new("Rose Hall"),
///     &TimeFields::new("2024-06-01", "4", "00", "PM"),
///     &TimeFields::new("2024-06-02", "11", "00", "AM"),
///     8.25,
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuoteBuilder {
    set_code: Option<SetCode>,
    set_title: Option<String>,
}

impl QuoteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing set code instead of generating one.
    pub fn with_set_code(mut self, code: SetCode) -> Self {
        self.set_code = Some(code);
        self
    }

    /// Override the set title (defaults to the venue name).
    pub fn with_set_title(mut self, title: impl Into<String>) -> Self {
        self.set_title = Some(title.into());
        self
    }

    /// Check the form against the wishlist without a tax rate.
    ///
    /// Runs every check [`build`](Self::build) does except the tax one and
    /// returns the resolved start and end instants.
    pub fn validate(
        &self,
        wishlist: &Wishlist,
        buyer: &BuyerInfo,
        venue: &VenueInfo,
        start: &TimeFields,
        end: &TimeFields,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), CommerceError> {
        if wishlist.is_empty() {
            return Err(CommerceError::validation("products", "wishlist is empty"));
        }
        buyer.validate()?;
        venue.validate()?;

        let start_date = start.to_utc()?;
        let end_date = end.to_utc()?;
        if end_date < start_date {
            return Err(CommerceError::validation(
                "endDate",
                format!("end {end_date} is before start {start_date}"),
            ));
        }
        Ok((start_date, end_date))
    }

    /// Validate the inputs and assemble the payload.
    ///
    /// Fails with [`CommerceError::Validation`] naming the offending field
    /// (`products`, `name`, `phone`, `email`, `venueName`, `tax`, `endDate`),
    /// or with a date/time error when a time group does not parse.
    pub fn build(
        &self,
        wishlist: &Wishlist,
        buyer: &BuyerInfo,
        venue: &VenueInfo,
        start: &TimeFields,
        end: &TimeFields,
        tax_rate: f64,
    ) -> Result<QuotePayload, CommerceError> {
        let (start_date, end_date) = self.validate(wishlist, buyer, venue, start, end)?;
        if !tax_rate.is_finite() || tax_rate < 0.0 {
            return Err(CommerceError::validation(
                "tax",
                format!("tax rate must be a non-negative number, got {tax_rate}"),
            ));
        }

        let products: Vec<QuoteProduct> = wishlist
            .items()
            .iter()
            .map(|item| QuoteProduct {
                product: item.product.clone(),
                effective_price: item.effective_price,
                quantity: item.quantity,
                tax: tax_rate,
                product_total: item.total(),
                selected_date: item.selected_date,
            })
            .collect();
        let total_price: Money = products.iter().map(|p| p.product_total).sum();

        let set_code = self.set_code.clone().unwrap_or_else(SetCode::generate);
        let set_title = self
            .set_title
            .clone()
            .unwrap_or_else(|| venue.venue_name.trim().to_string());

        tracing::debug!(
            set_code = %set_code,
            products = products.len(),
            total = %total_price,
            "quote payload built"
        );

        Ok(QuotePayload {
            buyer: buyer.clone(),
            venue: venue.clone(),
            start_date,
            end_date,
            set: vec![QuoteSet {
                set_code,
                set_title,
                start_date,
                end_date,
                products,
            }],
            total_price,
        })
    }
}
