//! HTTP surface of the producer.
//!
//! Requires the `rpc-server` feature (axum + tower-http).

pub mod server;

pub use server::{router, ApiError, AppState, HealthResponse, PriceQuery};
