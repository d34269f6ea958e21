//! Typed client for the event-rental storefront REST API.
//!
//! This crate provides:
//! - `StorefrontApi` - catalog, tax and quote-submission calls
//! - `Endpoint` - path, method and timeout of each call
//! - `ApiError` - failures tagged with the endpoint involved
//!
//! `StorefrontApi` implements [`rental_commerce::quote::QuoteTransport`], so it
//! can be handed straight to a `QuoteSubmission`.

mod client;
mod endpoint;
mod error;

pub use client::*;
pub use endpoint::*;
pub use error::*;
