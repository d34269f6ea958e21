//! Storefront API endpoints.

use std::time::Duration;

use rental_data::Method;

/// The REST endpoints the quote flow talks to.
///
/// Each endpoint carries its path, method and default timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /event-company-tax-value`
    TaxValue,
    /// `GET /web/event-products-details/:id`
    ProductDetails,
    /// `GET /web/main/all-products`
    AllProducts,
    /// `GET /web/products/discount`
    DiscountedProducts,
    /// `POST /save-payment`
    SavePayment,
    /// `POST /api/sent-cart-details`
    SentCartDetails,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::TaxValue => "/event-company-tax-value",
            Self::ProductDetails => "/web/event-products-details",
            Self::AllProducts => "/web/main/all-products",
            Self::DiscountedProducts => "/web/products/discount",
            Self::SavePayment => "/save-payment",
            Self::SentCartDetails => "/api/sent-cart-details",
        }
    }

    /// HTTP method the client sends.
    pub fn method(&self) -> Method {
        match self {
            Self::SavePayment | Self::SentCartDetails => Method::Post,
            _ => Method::Get,
        }
    }

    /// Default per-request timeout.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::TaxValue | Self::ProductDetails => Duration::from_secs(5),
            Self::AllProducts | Self::DiscountedProducts => Duration::from_secs(8),
            Self::SavePayment | Self::SentCartDetails => Duration::from_secs(15),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TaxValue => "tax-value",
            Self::ProductDetails => "product-details",
            Self::AllProducts => "all-products",
            Self::DiscountedProducts => "discounted-products",
            Self::SavePayment => "save-payment",
            Self::SentCartDetails => "sent-cart-details",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
