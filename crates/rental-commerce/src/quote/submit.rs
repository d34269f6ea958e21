//! Two-phase quote submission.
//!
//! A quote is delivered in two legs: the payload is saved with
//! `/save-payment`, then the summary goes to `/api/sent-cart-details`.
//! Progress is tracked on [`QuoteSubmission`] so a retry resumes at the
//! leg that failed with the same payload and set code. The wishlist is
//! cleared only after both legs succeed.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rental_cache::{Cache, Storage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CommerceError;
use crate::ids::SetCode;
use crate::money::Money;
use crate::quote::{CartDetails, QuotePayload};
use crate::wishlist::WishlistStore;

/// Deadline for a whole submission.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Slot key a failed submission is parked under.
pub const PENDING_QUOTE_KEY: &str = "pending-quote";

/// The two legs of a submission, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionLeg {
    /// `POST /save-payment`
    SavePayment,
    /// `POST /api/sent-cart-details`
    SentCartDetails,
}

impl SubmissionLeg {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionLeg::SavePayment => "save-payment",
            SubmissionLeg::SentCartDetails => "sent-cart-details",
        }
    }
}

impl fmt::Display for SubmissionLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transport call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No response within the transport's own timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The request never reached the server.
    #[error("{0}")]
    Unreachable(String),
}

impl TransportError {
    fn into_commerce(self, leg: SubmissionLeg) -> CommerceError {
        match self {
            TransportError::Timeout(after) => CommerceError::Timeout { leg, after },
            other => CommerceError::Transport {
                leg,
                message: other.to_string(),
            },
        }
    }
}

/// Delivers the two submission legs.
#[async_trait]
pub trait QuoteTransport: Send + Sync {
    /// Leg 1: save the quote request.
    async fn save_payment(&self, payload: &QuotePayload) -> Result<(), TransportError>;

    /// Leg 2: send the summary used for notifications.
    async fn send_cart_details(&self, details: &CartDetails) -> Result<(), TransportError>;
}

/// Result of a fully delivered submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub set_code: SetCode,
    pub total_price: Money,
    /// `false` if clearing the wishlist failed after delivery.
    pub wishlist_cleared: bool,
}

/// A quote on its way to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSubmission {
    payload: QuotePayload,
    details: CartDetails,
    payment_saved: bool,
    details_sent: bool,
}

impl QuoteSubmission {
    /// Start a submission for a freshly built payload.
    pub fn new(payload: QuotePayload) -> Self {
        let details = CartDetails::from_payload(&payload);
        Self {
            payload,
            details,
            payment_saved: false,
            details_sent: false,
        }
    }

    pub fn payload(&self) -> &QuotePayload {
        &self.payload
    }

    pub fn details(&self) -> &CartDetails {
        &self.details
    }

    pub fn set_code(&self) -> &SetCode {
        &self.details.set_code
    }

    /// Whether leg 1 already succeeded.
    pub fn payment_saved(&self) -> bool {
        self.payment_saved
    }

    /// The next leg to run, `None` once both are done.
    pub fn pending_leg(&self) -> Option<SubmissionLeg> {
        if !self.payment_saved {
            Some(SubmissionLeg::SavePayment)
        } else if !self.details_sent {
            Some(SubmissionLeg::SentCartDetails)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pending_leg().is_none()
    }

    /// Run the remaining legs within `deadline`, then clear the wishlist.
    ///
    /// On failure the error names the failed leg and the submission keeps
    /// its progress, so calling `submit` again resumes at that leg.
    pub async fn submit<T, S>(
        &mut self,
        transport: &T,
        wishlist: &WishlistStore<S>,
        deadline: Duration,
    ) -> Result<SubmissionOutcome, CommerceError>
    where
        T: QuoteTransport + ?Sized,
        S: Storage,
    {
        let set_code = self.set_code().clone();

        let result = tokio::time::timeout(deadline, self.run_legs(transport)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(
                    set_code = %set_code,
                    leg = ?e.leg(),
                    payment_saved = self.payment_saved,
                    error = %e,
                    "quote submission failed"
                );
                return Err(e);
            }
            Err(_) => {
                let leg = self.pending_leg().unwrap_or(SubmissionLeg::SentCartDetails);
                tracing::error!(
                    set_code = %set_code,
                    leg = %leg,
                    payment_saved = self.payment_saved,
                    "quote submission timed out"
                );
                return Err(CommerceError::Timeout {
                    leg,
                    after: deadline,
                });
            }
        }

        let wishlist_cleared = match wishlist.clear() {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(set_code = %set_code, error = %e, "quote delivered but wishlist not cleared");
                false
            }
        };

        tracing::info!(set_code = %set_code, total = %self.payload.total_price, "quote submitted");

        Ok(SubmissionOutcome {
            set_code,
            total_price: self.payload.total_price,
            wishlist_cleared,
        })
    }

    async fn run_legs<T>(&mut self, transport: &T) -> Result<(), CommerceError>
    where
        T: QuoteTransport + ?Sized,
    {
        if !self.payment_saved {
            tracing::info!(set_code = %self.set_code(), leg = %SubmissionLeg::SavePayment, "sending quote leg");
            transport
                .save_payment(&self.payload)
                .await
                .map_err(|e| e.into_commerce(SubmissionLeg::SavePayment))?;
            self.payment_saved = true;
        }

        if !self.details_sent {
            tracing::info!(set_code = %self.set_code(), leg = %SubmissionLeg::SentCartDetails, "sending quote leg");
            transport
                .send_cart_details(&self.details)
                .await
                .map_err(|e| e.into_commerce(SubmissionLeg::SentCartDetails))?;
            self.details_sent = true;
        }

        Ok(())
    }

    /// Park this submission so a later run can resume it.
    pub fn save_pending<S: Storage>(&self, cache: &Cache<S>) -> Result<(), CommerceError> {
        cache.set(PENDING_QUOTE_KEY, self)?;
        tracing::debug!(set_code = %self.set_code(), "pending quote saved");
        Ok(())
    }

    /// Load a parked submission, if any.
    pub fn load_pending<S: Storage>(cache: &Cache<S>) -> Result<Option<Self>, CommerceError> {
        Ok(cache.get(PENDING_QUOTE_KEY)?)
    }

    /// Forget the parked submission.
    pub fn discard_pending<S: Storage>(cache: &Cache<S>) -> Result<(), CommerceError> {
        cache.delete(PENDING_QUOTE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::datetime::TimeFields;
    use crate::quote::{BuyerInfo, QuoteBuilder, VenueInfo};
    use rental_cache::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTransport {
        save_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        fail_save: Mutex<Option<TransportError>>,
        fail_details: Mutex<Option<TransportError>>,
        hang_details: bool,
    }

    #[async_trait]
    impl QuoteTransport for MockTransport {
        async fn save_payment(&self, _payload: &QuotePayload) -> Result<(), TransportError> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_save.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn send_cart_details(&self, _details: &CartDetails) -> Result<(), TransportError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.hang_details {
                std::future::pending::<()>().await;
            }
            match self.fail_details.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    fn setup() -> (WishlistStore<MemoryStore>, QuoteSubmission) {
        let store = WishlistStore::new(MemoryStore::new());
        store.add(&Product::new("a", "Table", 100.0), 2, None).unwrap();
        let payload = QuoteBuilder::new()
            .build(
                &store.snapshot(),
                &BuyerInfo::new("Ada", "555", "ada@example.com"),
                &VenueInfo::new("Rose Hall"),
                &TimeFields::new("2024-06-01", "9", "00", "AM"),
                &TimeFields::new("2024-06-01", "5", "00", "PM"),
                0.0,
            )
            .unwrap();
        (store, QuoteSubmission::new(payload))
    }

    #[tokio::test]
    async fn test_both_legs_then_clear() {
        let (store, mut submission) = setup();
        let transport = MockTransport::default();

        let outcome = submission
            .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
            .await
            .unwrap();

        assert!(outcome.wishlist_cleared);
        assert_eq!(outcome.total_price, Money::new(20000));
        assert!(store.snapshot().is_empty());
        assert!(submission.is_complete());
        assert_eq!(transport.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_leg_one_failure_keeps_wishlist() {
        let (store, mut submission) = setup();
        let transport = MockTransport::default();
        *transport.fail_save.lock().unwrap() = Some(TransportError::Unreachable("dns".into()));

        let err = submission
            .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(err.leg(), Some(SubmissionLeg::SavePayment));
        assert!(!submission.payment_saved());
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(transport.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retry_after_leg_two_skips_save_payment() {
        let (store, mut submission) = setup();
        let transport = MockTransport::default();
        *transport.fail_details.lock().unwrap() = Some(TransportError::Rejected {
            status: 502,
            message: "bad gateway".into(),
        });

        let err = submission
            .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.leg(), Some(SubmissionLeg::SentCartDetails));
        assert!(submission.payment_saved());
        assert_eq!(store.snapshot().len(), 1);

        let code_before = submission.set_code().clone();
        submission
            .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
            .await
            .unwrap();

        assert_eq!(transport.save_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.detail_calls.load(Ordering::SeqCst), 2);
        assert_eq!(submission.set_code(), &code_before);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_reports_pending_leg() {
        let (store, mut submission) = setup();
        let transport = MockTransport {
            hang_details: true,
            ..Default::default()
        };

        let err = submission
            .submit(&transport, &store, Duration::from_millis(50))
            .await
            .unwrap_err();

        match err {
            CommerceError::Timeout { leg, after } => {
                assert_eq!(leg, SubmissionLeg::SentCartDetails);
                assert_eq!(after, Duration::from_millis(50));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(submission.payment_saved());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_timeout_maps_to_timeout() {
        let (store, mut submission) = setup();
        let transport = MockTransport::default();
        *transport.fail_save.lock().unwrap() = Some(TransportError::Timeout(Duration::from_secs(10)));

        let err = submission
            .submit(&transport, &store, DEFAULT_SUBMIT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::Timeout {
                leg: SubmissionLeg::SavePayment,
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_pending_round_trip() {
        let (_, mut submission) = setup();
        submission.payment_saved = true;
        let cache = Cache::new(MemoryStore::new());

        submission.save_pending(&cache).unwrap();
        let loaded = QuoteSubmission::load_pending(&cache).unwrap().unwrap();
        assert_eq!(loaded, submission);
        assert_eq!(loaded.pending_leg(), Some(SubmissionLeg::SentCartDetails));

        QuoteSubmission::discard_pending(&cache).unwrap();
        assert!(QuoteSubmission::load_pending(&cache).unwrap().is_none());
    }
}
