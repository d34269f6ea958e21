//! HTTP client utilities for the rental quote core.
//!
//! Provides a small builder API over `reqwest` with base-URL resolution,
//! default headers, per-client timeouts and retry of idempotent requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use rental_data::FetchClient;
//!
//! let client = FetchClient::new()?.with_base_url("https://api.example.com");
//!
//! let product: Product = client
//!     .get("/web/event-products-details/64f0c2")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//!
//! client
//!     .post("/save-payment")
//!     .json(&payload)?
//!     .send()
//!     .await?
//!     .error_for_status()?;
//! ```

mod error;
mod request;
mod response;
mod retry;
mod timeout;

use std::collections::HashMap;
use std::time::Duration;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: TimeoutConfig,
    retry: RetryPolicy,
}

impl FetchClient {
    /// Create a new HTTP client with default timeouts.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeouts(TimeoutConfig::default())
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(timeout: TimeoutConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: None,
            default_headers: HashMap::new(),
            timeout,
            retry: RetryPolicy::default(),
        })
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The configured timeouts.
    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeout
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let full_url = self.resolve(url.into());

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    /// Join a path onto the base URL; absolute URLs pass through.
    pub fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let mut attempt = 0u32;

        loop {
            let outcome = self.send_once(&request).await;
            let retry = self.retry.should_retry(request.method, &outcome, attempt);

            if !retry {
                return outcome;
            }

            let delay = self.retry.backoff.delay_for_attempt(attempt);
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "retrying request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once(&self, request: &RequestBuilder) -> Result<Response, FetchError> {
        let mut req = self
            .http
            .request(request.method.to_reqwest(), &request.url);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }
        let limit = request.timeout.unwrap_or(self.timeout.total);
        if request.timeout.is_some() {
            req = req.timeout(limit);
        }

        let resp = req.send().await.map_err(|e| classify(e, limit))?;
        let resp = Response::from_reqwest(resp).await?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = resp.status,
            "request completed"
        );
        Ok(resp)
    }

}

fn classify(e: reqwest::Error, limit: Duration) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(limit)
    } else if e.is_connect() {
        FetchError::Connection(e.to_string())
    } else if e.is_builder() {
        FetchError::InvalidUrl(e.to_string())
    } else {
        FetchError::RequestError(e.to_string())
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl ClientRequestBuilder<'_> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append query parameters.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query(pairs);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Override the client's total timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Inspect the request that would be sent.
    pub fn build(self) -> RequestBuilder {
        self.builder
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.client.execute(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, RetryPolicy, TimeoutConfig};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FetchClient {
        FetchClient::new()
            .unwrap()
            .with_base_url("https://api.rentals.test/")
            .with_default_header("Accept", "application/json")
    }

    #[test]
    fn test_relative_path_joined_to_base() {
        let req = client().get("/event-company-tax-value").build();
        assert_eq!(req.url(), "https://api.rentals.test/event-company-tax-value");
    }

    #[test]
    fn test_absolute_url_not_rebased() {
        let req = client().get("https://cdn.test/img.png").build();
        assert_eq!(req.url(), "https://cdn.test/img.png");
    }

    #[test]
    fn test_default_headers_applied() {
        let req = client().post("save-payment").build();
        assert_eq!(req.header_value("accept"), Some("application/json"));
        assert_eq!(req.method(), Method::Post);
    }

    #[test]
    fn test_no_base_url_keeps_path() {
        let client = FetchClient::new().unwrap();
        assert_eq!(client.resolve("/x".to_string()), "/x");
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let client = FetchClient::new().unwrap().with_retry(RetryPolicy::none());
        let result = client.get("not a url").send().await;
        assert!(result.is_err());
    }
}
