//! Raw price sources.
//!
//! The producer only needs "token id in, USD quote out". [`PriceSource`] is
//! that seam; [`HttpPriceSource`] implements it against any
//! CoinGecko-compatible `simple/price` endpoint:
//!
//! ```text
//! GET <url>?ids=<token>&vs_currencies=usd
//! -> { "<token>": { "usd": <number> } }
//! ```

#[cfg(feature = "async-oracle")]
use async_trait::async_trait;
#[cfg(feature = "async-oracle")]
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(feature = "async-oracle")]
use tracing::{debug, warn};

#[cfg(feature = "async-oracle")]
use crate::error::{Error, Result};
#[cfg(feature = "async-oracle")]
use crate::utils::constants::{DEFAULT_PRICE_SOURCE_URL, QUOTE_CURRENCY};

// ═══════════════════════════════════════════════════════════════════════════════
// PRICE API RESPONSE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Quote entry for one token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsdQuote {
    /// USD price, absent when the source has no quote
    #[serde(default)]
    pub usd: Option<f64>,
}

/// `simple/price` response, keyed by token id
pub type SimplePriceResponse = HashMap<String, UsdQuote>;

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration shared by the outbound HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// Request timeout in milliseconds; `None` leaves the deadline to the caller
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            user_agent: format!("{}/{}", crate::PROTOCOL_NAME, crate::VERSION),
        }
    }
}

impl HttpFetcherConfig {
    /// Default configuration with a whole-request timeout in seconds
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout_ms: Some(secs.saturating_mul(1_000)),
            ..Default::default()
        }
    }

    /// Build a reqwest client from this configuration
    #[cfg(feature = "async-oracle")]
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(&self.user_agent);
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(ms));
        }
        builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRICE SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolves a token id to a USD quote
#[cfg(feature = "async-oracle")]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current USD price of `token`.
    ///
    /// Fails with [`Error::PriceNotFound`] when the source has no quote for
    /// the token and [`Error::PriceSource`] for any other upstream failure.
    async fn usd_price(&self, token: &str) -> Result<f64>;
}

/// HTTP price source for CoinGecko-compatible APIs
#[cfg(feature = "async-oracle")]
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: Client,
    base_url: String,
}

#[cfg(feature = "async-oracle")]
impl HttpPriceSource {
    /// Create a price source; `None` selects the public CoinGecko API
    pub fn new(base_url: Option<String>, config: &HttpFetcherConfig) -> Result<Self> {
        let base_url = base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_PRICE_SOURCE_URL.to_string());
        Ok(Self {
            client: config.build_client()?,
            base_url,
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(None, &HttpFetcherConfig::default())
    }

    /// Endpoint queried for prices
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "async-oracle")]
#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn usd_price(&self, token: &str) -> Result<f64> {
        debug!(token, source = %self.base_url, "fetching raw price");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ids", token), ("vs_currencies", QUOTE_CURRENCY)])
            .send()
            .await
            .map_err(|e| {
                warn!(token, error = %e, "price source unreachable");
                Error::PriceSource(format!("failed to fetch price data from {}: {}", self.base_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(token, %status, "price source returned error status");
            return Err(Error::PriceSource(format!(
                "price data source returned non-200 status: {}",
                status
            )));
        }

        let data: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| Error::PriceSource(format!("failed to decode price data: {}", e)))?;

        data.get(token)
            .and_then(|quote| quote.usd)
            .ok_or_else(|| Error::PriceNotFound(token.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_config_default() {
        let config = HttpFetcherConfig::default();
        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.user_agent, format!("{}/{}", crate::PROTOCOL_NAME, crate::VERSION));
        assert!(config.user_agent.starts_with("arkham-oracle/"));
    }

    #[test]
    fn test_timeout_secs_saturates() {
        assert_eq!(HttpFetcherConfig::with_timeout_secs(3).timeout_ms, Some(3_000));
        assert_eq!(
            HttpFetcherConfig::with_timeout_secs(u64::MAX / 10).timeout_ms,
            Some(u64::MAX)
        );
    }

    #[test]
    fn test_simple_price_response_parsing() {
        let data: SimplePriceResponse =
            serde_json::from_str(r#"{"solana":{"usd":150.25},"bitcoin":{"eur":90000}}"#).unwrap();

        assert_eq!(data["solana"].usd, Some(150.25));
        assert_eq!(data["bitcoin"].usd, None);
        assert!(!data.contains_key("ethereum"));
    }

    #[cfg(feature = "async-oracle")]
    mod http {
        use super::super::*;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        async fn source_for(server: &MockServer) -> HttpPriceSource {
            HttpPriceSource::new(
                Some(format!("{}/simple/price", server.uri())),
                &HttpFetcherConfig::default(),
            )
            .unwrap()
        }

        #[test]
        fn test_default_url() {
            let source = HttpPriceSource::with_defaults().unwrap();
            assert_eq!(source.base_url(), DEFAULT_PRICE_SOURCE_URL);

            let source = HttpPriceSource::new(Some(String::new()), &HttpFetcherConfig::default()).unwrap();
            assert_eq!(source.base_url(), DEFAULT_PRICE_SOURCE_URL);
        }

        #[tokio::test]
        async fn test_fetches_quote() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/simple/price"))
                .and(query_param("ids", "solana"))
                .and(query_param("vs_currencies", "usd"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"solana": {"usd": 150.25}})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let price = source_for(&server).await.usd_price("solana").await.unwrap();
            assert_eq!(price, 150.25);
        }

        #[tokio::test]
        async fn test_absent_token_is_not_found() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
                .mount(&server)
                .await;

            let err = source_for(&server).await.usd_price("nope").await.unwrap_err();
            assert_eq!(err, Error::PriceNotFound("nope".into()));
        }

        #[tokio::test]
        async fn test_error_status_is_source_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(429))
                .mount(&server)
                .await;

            let err = source_for(&server).await.usd_price("solana").await.unwrap_err();
            assert!(matches!(err, Error::PriceSource(msg) if msg.contains("429")));
        }

        #[tokio::test]
        async fn test_garbage_body_is_source_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
                .mount(&server)
                .await;

            let err = source_for(&server).await.usd_price("solana").await.unwrap_err();
            assert!(matches!(err, Error::PriceSource(_)));
        }

        #[tokio::test]
        async fn test_configured_timeout_applies() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"solana": {"usd": 1.0}}))
                        .set_delay(std::time::Duration::from_secs(2)),
                )
                .mount(&server)
                .await;

            let config = HttpFetcherConfig {
                timeout_ms: Some(50),
                ..Default::default()
            };
            let source = HttpPriceSource::new(Some(server.uri()), &config).unwrap();

            let err = source.usd_price("solana").await.unwrap_err();
            assert!(matches!(err, Error::PriceSource(_)));
        }

        #[tokio::test]
        async fn test_unreachable_is_source_error() {
            let source = HttpPriceSource::new(
                Some("http://127.0.0.1:1/simple/price".into()),
                &HttpFetcherConfig::default(),
            )
            .unwrap();

            let err = source.usd_price("solana").await.unwrap_err();
            assert!(matches!(err, Error::PriceSource(_)));
        }
    }
}
