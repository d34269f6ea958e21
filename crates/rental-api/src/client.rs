//! Typed storefront client.

use std::time::Duration;

use async_trait::async_trait;
use rental_commerce::catalog::{PriceField, Product};
use rental_commerce::ids::ProductId;
use rental_commerce::quote::{CartDetails, QuotePayload, QuoteTransport, TransportError};
use rental_commerce::search::{ProductFilter, ProductPage};
use rental_data::{FetchClient, Response, RetryPolicy, TimeoutConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxValueResponse {
    tax_value: PriceField,
}

/// Client for the storefront REST API.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: FetchClient,
}

impl StorefrontApi {
    /// Wrap a configured fetch client. Its base URL must point at the API.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Build a client for `base_url`.
    ///
    /// Only GET requests are retried; `max_retries` bounds the extra attempts.
    pub fn connect(
        base_url: impl Into<String>,
        request_timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, ApiError> {
        let client = FetchClient::with_timeouts(TimeoutConfig::from_total(request_timeout))
            .map_err(|e| ApiError::Setup(e.to_string()))?
            .with_base_url(base_url)
            .with_default_header("Accept", "application/json")
            .with_retry(RetryPolicy::new(max_retries));
        Ok(Self::new(client))
    }

    /// The API base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.client.base_url()
    }

    /// Current company tax rate.
    pub async fn tax_value(&self) -> Result<f64, ApiError> {
        let endpoint = Endpoint::TaxValue;
        let body: TaxValueResponse = self.get_json(endpoint, endpoint.path(), &[]).await?;
        body.tax_value
            .value()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ApiError::Decode {
                endpoint,
                message: format!("taxValue is not a number: {:?}", body.tax_value),
            })
    }

    /// One product by id.
    pub async fn product_details(&self, id: &ProductId) -> Result<Product, ApiError> {
        let endpoint = Endpoint::ProductDetails;
        let path = format!("{}/{}", endpoint.path(), id);
        self.get_json(endpoint, &path, &[]).await
    }

    /// A page of the full catalog.
    pub async fn all_products(&self, filter: &ProductFilter) -> Result<ProductPage, ApiError> {
        let endpoint = Endpoint::AllProducts;
        self.get_json(endpoint, endpoint.path(), &filter.query_pairs())
            .await
    }

    /// A page of products with an active promotion.
    pub async fn discounted_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<ProductPage, ApiError> {
        let endpoint = Endpoint::DiscountedProducts;
        self.get_json(endpoint, endpoint.path(), &filter.query_pairs())
            .await
    }

    /// Submission leg 1.
    pub async fn save_payment(&self, payload: &QuotePayload) -> Result<(), ApiError> {
        self.post_json(Endpoint::SavePayment, payload).await
    }

    /// Submission leg 2.
    pub async fn send_cart_details(&self, details: &CartDetails) -> Result<(), ApiError> {
        self.post_json(Endpoint::SentCartDetails, details).await
    }

    /// The endpoint's default timeout, never longer than the configured one.
    fn timeout_for(&self, endpoint: Endpoint) -> Duration {
        endpoint.default_timeout().min(self.client.timeouts().total)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(endpoint = %endpoint, path, "fetching");
        let resp = self
            .client
            .request(endpoint.method(), path)
            .query(query.iter().map(|(k, v)| (*k, v.clone())))
            .timeout(self.timeout_for(endpoint))
            .send()
            .await
            .map_err(|e| ApiError::from_fetch(endpoint, e))?;
        decode(endpoint, resp)
    }

    async fn post_json<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError> {
        let resp = self
            .client
            .request(endpoint.method(), endpoint.path())
            .json(body)
            .map_err(|e| ApiError::from_fetch(endpoint, e))?
            .timeout(self.timeout_for(endpoint))
            .send()
            .await
            .map_err(|e| ApiError::from_fetch(endpoint, e))?;

        resp.error_for_status()
            .map_err(|e| ApiError::from_fetch(endpoint, e))?;
        tracing::debug!(endpoint = %endpoint, "posted");
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, resp: Response) -> Result<T, ApiError> {
    resp.error_for_status()
        .and_then(|r| r.json())
        .map_err(|e| ApiError::from_fetch(endpoint, e))
}

#[async_trait]
impl QuoteTransport for StorefrontApi {
    async fn save_payment(&self, payload: &QuotePayload) -> Result<(), TransportError> {
        StorefrontApi::save_payment(self, payload)
            .await
            .map_err(TransportError::from)
    }

    async fn send_cart_details(&self, details: &CartDetails) -> Result<(), TransportError> {
        StorefrontApi::send_cart_details(self, details)
            .await
            .map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_commerce::money::Money;
    use rental_commerce::search::SortOption;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve one canned response per connection and report each request head.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let head = read_request(&mut socket).await;
                let _ = tx.send(head);
                let reply = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{addr}"), rx)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn api(base: String) -> StorefrontApi {
        StorefrontApi::connect(base, Duration::from_secs(5), 0).unwrap()
    }

    #[tokio::test]
    async fn test_tax_value_accepts_numeric_string() {
        let (base, mut rx) = serve(vec![(200, r#"{"taxValue":"8.25"}"#)]).await;
        let tax = api(base).tax_value().await.unwrap();
        assert_eq!(tax, 8.25);
        assert!(rx.recv().await.unwrap().starts_with("GET /event-company-tax-value"));
    }

    #[tokio::test]
    async fn test_all_products_sends_filter_query() {
        let body = r#"{"products":[{"_id":"a","title":"Bar Cart","perDayPricing":45}],"totalPages":3,"totalProducts":25}"#;
        let (base, mut rx) = serve(vec![(200, body)]).await;
        let filter = ProductFilter::new()
            .search("cart")
            .price_range(Some(Money::new(1000)), None)
            .sort(SortOption::PriceAsc)
            .page(2);

        let page = api(base).all_products(&filter).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total_products, Some(25));

        let head = rx.recv().await.unwrap();
        assert!(
            head.starts_with("GET /web/main/all-products?search=cart&minPrice=10&sort=price-asc&page=2 "),
            "unexpected request line: {head}"
        );
    }

    #[tokio::test]
    async fn test_product_details_path() {
        let (base, mut rx) = serve(vec![(200, r#"{"_id":"abc","title":"Arch","perDayPricing":90}"#)]).await;
        let product = api(base).product_details(&ProductId::new("abc")).await.unwrap();
        assert_eq!(product.title, "Arch");
        assert!(rx
            .recv()
            .await
            .unwrap()
            .starts_with("GET /web/event-products-details/abc "));
    }

    #[tokio::test]
    async fn test_rejected_post_maps_to_status() {
        let (base, mut rx) = serve(vec![(500, r#"{"message":"db down"}"#)]).await;
        let details_json = serde_json::json!({});
        let err = api(base)
            .post_json(Endpoint::SentCartDetails, &details_json)
            .await
            .unwrap_err();

        match err {
            ApiError::Status { endpoint, status, message } => {
                assert_eq!(endpoint, Endpoint::SentCartDetails);
                assert_eq!(status, 500);
                assert!(message.contains("db down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let head = rx.recv().await.unwrap();
        assert!(head.starts_with("POST /api/sent-cart-details "));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
    }

    #[test]
    fn test_configured_timeout_caps_endpoint_default() {
        let api = StorefrontApi::connect("http://127.0.0.1:9", Duration::from_secs(2), 0).unwrap();
        assert_eq!(api.timeout_for(Endpoint::TaxValue), Duration::from_secs(2));
        assert_eq!(api.timeout_for(Endpoint::SavePayment), Duration::from_secs(2));

        let api = StorefrontApi::connect("http://127.0.0.1:9", Duration::from_secs(60), 0).unwrap();
        assert_eq!(api.timeout_for(Endpoint::AllProducts), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_short_request_timeout_is_honoured() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let api = StorefrontApi::connect(format!("http://{addr}"), Duration::from_millis(200), 0)
            .unwrap();
        let started = std::time::Instant::now();
        let err = api.tax_value().await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(3));
        match err {
            ApiError::Timeout { endpoint, after } => {
                assert_eq!(endpoint, Endpoint::TaxValue);
                assert_eq!(after, Duration::from_millis(200));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let (base, _rx) = serve(vec![(200, r#"{"items":"nope"}"#)]).await;
        let err = api(base).tax_value().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { endpoint: Endpoint::TaxValue, .. }));
    }
}
