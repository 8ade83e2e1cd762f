//! Attestation consumer.
//!
//! Fetches a signed record from an oracle endpoint and rebuilds the digest
//! it was signed over. Whoever holds the oracle public key (often an on-chain
//! program) checks `{message_hash, signature}`; [`OracleClient::fetch_verified_price`]
//! does that check locally when the key is known.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::attestation::{require_valid, AttestedPrice};
use crate::error::{Error, Result};
use crate::oracle::fetchers::HttpFetcherConfig;
use crate::utils::constants::{TOKEN_PARAM, TRUSTED_CLIENT_KEY_PARAM};
use crate::utils::crypto::PublicKey;

/// `{"error": "..."}` body returned with non-200 responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Client for an oracle price endpoint
#[derive(Debug, Clone)]
pub struct OracleClient {
    client: Client,
    base_url: String,
    trusted_key: Option<String>,
}

impl OracleClient {
    /// Create a client for the endpoint at `base_url` (e.g. `https://host/api/price`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(base_url, &HttpFetcherConfig::default())
    }

    /// Create with explicit HTTP settings
    pub fn with_config(base_url: impl Into<String>, config: &HttpFetcherConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_client()?,
            base_url: base_url.into(),
            trusted_key: None,
        })
    }

    /// Send `trustedClientKey` with every request (for gated producers)
    pub fn with_trusted_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.trusted_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Oracle endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a signed price for `token`.
    ///
    /// Any non-success status, missing field or unparseable field fails the
    /// whole fetch with [`Error::MalformedResponse`].
    pub async fn fetch_signed_price(&self, token: &str) -> Result<AttestedPrice> {
        let mut params = vec![(TOKEN_PARAM, token)];
        if let Some(key) = &self.trusted_key {
            params.push((TRUSTED_CLIENT_KEY_PARAM, key.as_str()));
        }

        debug!(token, url = %self.base_url, "requesting signed price");
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("failed to call oracle API: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read oracle response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_default();
            warn!(token, %status, reason = %message, "oracle rejected request");
            return Err(Error::MalformedResponse(format!(
                "oracle API returned non-200 status: {} - {}",
                status, message
            )));
        }

        AttestedPrice::from_json(&body)
    }

    /// Fetch a signed price and check it against the oracle public key
    pub async fn fetch_verified_price(&self, token: &str, oracle: &PublicKey) -> Result<AttestedPrice> {
        let record = self.fetch_signed_price(token).await?;
        require_valid(record, oracle)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{message_hash, PriceSigner};
    use crate::utils::crypto::OracleKeypair;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_and_reconstruct_hash() {
        let signer = PriceSigner::new(OracleKeypair::generate());
        let record = signer.sign(150_250_000, 1_700_000_000);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("token", "solana"))
            .respond_with(ResponseTemplate::new(200).set_body_string(record.to_json().unwrap()))
            .expect(1)
            .mount(&server)
            .await;

        let client = OracleClient::new(server.uri()).unwrap();
        let fetched = client.fetch_signed_price("solana").await.unwrap();

        assert_eq!(fetched, record);
        assert_eq!(fetched.message_hash(), message_hash(150_250_000, 1_700_000_000));
        assert!(fetched.verify(&signer.public_key()));
    }

    #[tokio::test]
    async fn test_sends_trusted_key() {
        let signer = PriceSigner::new(OracleKeypair::generate());
        let record = signer.sign(1, 2);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("trustedClientKey", "k1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(record.to_json().unwrap()))
            .expect(1)
            .mount(&server)
            .await;

        let client = OracleClient::new(server.uri()).unwrap().with_trusted_key("k1");
        assert!(client.fetch_signed_price("solana").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_signature_is_malformed() {
        let server = MockServer::start().await;
        serve(
            &server,
            200,
            serde_json::json!({"price": "150250000", "timestamp": "1700000000"}),
        )
        .await;

        let client = OracleClient::new(server.uri()).unwrap();
        assert!(matches!(
            client.fetch_signed_price("solana").await,
            Err(Error::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let server = MockServer::start().await;
        serve(&server, 401, serde_json::json!({"error": "Unauthorized"})).await;

        let client = OracleClient::new(server.uri()).unwrap();
        let err = client.fetch_signed_price("solana").await.unwrap_err();

        assert!(matches!(&err, Error::MalformedResponse(msg) if msg.contains("401") && msg.contains("Unauthorized")));
    }

    #[tokio::test]
    async fn test_fetch_verified_price_rejects_foreign_signature() {
        let record = PriceSigner::new(OracleKeypair::generate()).sign(1, 2);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(record.to_json().unwrap()))
            .mount(&server)
            .await;

        let client = OracleClient::new(server.uri()).unwrap();
        let stranger = OracleKeypair::generate().public_key();
        assert_eq!(
            client.fetch_verified_price("solana", &stranger).await,
            Err(Error::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let client = OracleClient::new("http://127.0.0.1:1/api/price").unwrap();
        assert!(matches!(
            client.fetch_signed_price("solana").await,
            Err(Error::Transport(_))
        ));
    }
}
