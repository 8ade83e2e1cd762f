//! Producer HTTP endpoint.
//!
//! ```text
//! GET /api/price?token=<id>[&trustedClientKey=<key>]  -> signed record
//! GET /health                                         -> liveness + oracle key
//! ```
//!
//! Failures are returned as `{"error": "<message>"}` with the status from
//! [`Error::http_status`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::attestation::AttestedPrice;
use crate::error::Error;
use crate::oracle::producer::AttestationProducer;
use crate::utils::constants::PRICE_ENDPOINT_PATH;

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    /// Signs attestations for every request
    pub producer: AttestationProducer,
}

impl AppState {
    /// Wrap a producer for sharing across handlers
    pub fn new(producer: AttestationProducer) -> Arc<Self> {
        Arc::new(Self { producer })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// API TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Query string of the price endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PriceQuery {
    /// Token id at the price source (e.g. `solana`)
    #[serde(default)]
    pub token: Option<String>,
    /// Caller identifier checked against the allow-list
    #[serde(default, rename = "trustedClientKey")]
    pub trusted_client_key: Option<String>,
}

/// `GET /health` body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Oracle public key in hex
    pub public_key: String,
}

/// Error response carrying the HTTP status of the underlying [`Error`]
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, code = self.0.code(), "price request failed");
        }

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

/// GET /health - Health check
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: "arkham-oracle-server".into(),
        version: crate::VERSION.into(),
        public_key: state.producer.public_key().to_hex(),
    })
}

/// GET /api/price - Signed price attestation
async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<AttestedPrice>, ApiError> {
    let token = query.token.unwrap_or_default();
    let record = state
        .producer
        .attest(&token, query.trusted_client_key.as_deref())
        .await
        .map_err(|err| {
            if !matches!(err, Error::Unauthorized) {
                warn!(token = %token, error = %err, "attestation not issued");
            }
            err
        })?;

    Ok(Json(record))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Build the producer router with tracing, compression and permissive CORS
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(PRICE_ENDPOINT_PATH, get(get_price))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
