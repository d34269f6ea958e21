//! Commerce error types.

use std::time::Duration;

use thiserror::Error;

use crate::quote::SubmissionLeg;

/// Errors that can occur in wishlist and quote operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Base price or promotion value is missing, non-numeric or negative.
    #[error("Invalid price for product {product_id}: {reason}")]
    InvalidPrice { product_id: String, reason: String },

    /// Calendar date could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Clock fields out of range or unparsable.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A quote field failed validation.
    #[error("Validation error on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Product is not in the wishlist.
    #[error("Product not in wishlist: {0}")]
    NotFound(String),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u32, u32),

    /// A submission leg did not finish before its deadline.
    #[error("{leg} timed out after {after:?}")]
    Timeout { leg: SubmissionLeg, after: Duration },

    /// A submission leg was rejected or could not be delivered.
    #[error("{leg} failed: {message}")]
    Transport { leg: SubmissionLeg, message: String },

    /// Durable slot error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CommerceError {
    /// Create a validation error for a named field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        CommerceError::Validation {
            field,
            message: message.into(),
        }
    }

    /// The offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CommerceError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// The submission leg that failed, if this is a submission error.
    pub fn leg(&self) -> Option<SubmissionLeg> {
        match self {
            CommerceError::Timeout { leg, .. } | CommerceError::Transport { leg, .. } => {
                Some(*leg)
            }
            _ => None,
        }
    }

    /// Whether retrying the same submission may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CommerceError::Timeout { .. } | CommerceError::Transport { .. }
        )
    }
}

impl From<rental_cache::CacheError> for CommerceError {
    fn from(e: rental_cache::CacheError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Storage(e.to_string())
    }
}
