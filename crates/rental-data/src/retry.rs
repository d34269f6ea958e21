//! Retry policies for fetch operations.

use std::time::Duration;

use crate::{FetchError, Method, Response};

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                base.saturating_mul(multiplier).min(*max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_secs(2),
        }
    }
}

/// Failures worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// A specific HTTP status code, e.g. 429.
    StatusCode(u16),
    /// Any 5xx status.
    ServerError,
    /// No response within the timeout.
    Timeout,
    /// The connection could not be established or was dropped.
    ConnectionError,
}

impl RetryCondition {
    /// Whether this condition covers the outcome of one attempt.
    pub fn matches(&self, outcome: &Result<Response, FetchError>) -> bool {
        match (self, outcome) {
            (Self::StatusCode(code), Ok(resp)) => resp.status == *code,
            (Self::ServerError, Ok(resp)) => resp.is_server_error(),
            (Self::Timeout, Err(FetchError::Timeout(_))) => true,
            (Self::ConnectionError, Err(FetchError::Connection(_))) => true,
            _ => false,
        }
    }
}

/// When and how often a request is re-sent.
///
/// Only idempotent methods are ever retried, so a POST is sent at most once
/// whatever the policy says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Retry 5xx, timeouts and dropped connections up to `max_attempts` times.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Also retry on `condition`.
    pub fn retry_on(mut self, condition: RetryCondition) -> Self {
        if !self.retry_on.contains(&condition) {
            self.retry_on.push(condition);
        }
        self
    }

    /// Decide whether attempt number `attempt` (0-indexed) gets a successor.
    pub fn should_retry(
        &self,
        method: Method,
        outcome: &Result<Response, FetchError>,
        attempt: u32,
    ) -> bool {
        method.is_idempotent()
            && attempt < self.max_attempts
            && self.retry_on.iter().any(|c| c.matches(outcome))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_exponential_backoff_caps_at_max() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(500),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(500));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(500));
    }

    fn status(code: u16) -> Result<Response, FetchError> {
        Ok(Response::new(code, HashMap::new(), Vec::new()))
    }

    #[test]
    fn test_retry_on_server_error_until_exhausted() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(Method::Get, &status(503), 0));
        assert!(policy.should_retry(Method::Get, &status(503), 1));
        assert!(!policy.should_retry(Method::Get, &status(503), 2));
        assert!(!policy.should_retry(Method::Get, &status(404), 0));
    }

    #[test]
    fn test_post_is_never_retried() {
        let policy = RetryPolicy::new(5);
        assert!(!policy.should_retry(Method::Post, &status(503), 0));
        assert!(!policy.should_retry(
            Method::Post,
            &Err(FetchError::Connection("reset".into())),
            0
        ));
    }

    #[test]
    fn test_extra_condition() {
        let policy = RetryPolicy::new(1).retry_on(RetryCondition::StatusCode(429));
        assert!(policy.should_retry(Method::Get, &status(429), 0));
        assert!(policy.should_retry(
            Method::Head,
            &Err(FetchError::Timeout(Duration::from_secs(1))),
            0
        ));
    }

    #[test]
    fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        assert!(!policy.should_retry(Method::Get, &status(500), 0));
        assert!(!policy.should_retry(
            Method::Get,
            &Err(FetchError::Timeout(Duration::from_secs(1))),
            0
        ));
    }
}
