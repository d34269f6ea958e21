//! Quote request module.
//!
//! Contains the contact types, payload construction and the two-phase
//! submission.

mod builder;
mod contact;
mod details;
mod payload;
mod submit;

pub use builder::QuoteBuilder;
pub use contact::{BuyerInfo, VenueInfo};
pub use details::{CartDetails, CartDetailsRow};
pub use payload::{QuotePayload, QuoteProduct, QuoteSet};
pub use submit::{
    QuoteSubmission, QuoteTransport, SubmissionLeg, SubmissionOutcome, TransportError,
    DEFAULT_SUBMIT_TIMEOUT, PENDING_QUOTE_KEY,
};
