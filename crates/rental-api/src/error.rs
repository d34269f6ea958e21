//! API error types.

use std::time::Duration;

use rental_commerce::quote::TransportError;
use rental_data::FetchError;
use thiserror::Error;

use crate::Endpoint;

/// Errors returned by [`crate::StorefrontApi`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// No response in time.
    #[error("{endpoint} timed out after {after:?}")]
    Timeout { endpoint: Endpoint, after: Duration },

    /// The request could not be delivered.
    #[error("{endpoint} unreachable: {message}")]
    Unreachable { endpoint: Endpoint, message: String },

    /// The response body did not have the expected shape.
    #[error("{endpoint} returned an unexpected body: {message}")]
    Decode { endpoint: Endpoint, message: String },

    /// The HTTP client could not be built.
    #[error("API client setup failed: {0}")]
    Setup(String),
}

impl ApiError {
    pub(crate) fn from_fetch(endpoint: Endpoint, e: FetchError) -> Self {
        match e {
            FetchError::HttpError { status, message } => ApiError::Status {
                endpoint,
                status,
                message,
            },
            FetchError::Timeout(after) => ApiError::Timeout { endpoint, after },
            FetchError::ParseError(message) | FetchError::JsonError(message) => {
                ApiError::Decode { endpoint, message }
            }
            other => ApiError::Unreachable {
                endpoint,
                message: other.to_string(),
            },
        }
    }

    /// The endpoint involved, if any.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ApiError::Status { endpoint, .. }
            | ApiError::Timeout { endpoint, .. }
            | ApiError::Unreachable { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => Some(*endpoint),
            ApiError::Setup(_) => None,
        }
    }
}

impl From<ApiError> for TransportError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status {
                status, message, ..
            } => TransportError::Rejected { status, message },
            ApiError::Timeout { after, .. } => TransportError::Timeout(after),
            other => TransportError::Unreachable(other.to_string()),
        }
    }
}
