//! Oracle roles.
//!
//! This module wires the attestation protocol to the outside world:
//! - Raw price sources (CoinGecko-compatible HTTP APIs)
//! - The producer: gate, price, sign
//! - The consumer: fetch, parse, rebuild the signed digest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arkham_oracle::oracle::OracleClient;
//!
//! let client = OracleClient::new("https://oracle.example/api/price")?
//!     .with_trusted_key("my-client-key");
//! let record = client.fetch_signed_price("solana").await?;
//!
//! // Hand these to the on-chain verifier
//! let hash = record.message_hash();
//! let signature = record.signature();
//! ```

pub mod fetchers;
#[cfg(feature = "async-oracle")]
pub mod consumer;
#[cfg(feature = "async-oracle")]
pub mod producer;

pub use fetchers::*;
#[cfg(feature = "async-oracle")]
pub use consumer::OracleClient;
#[cfg(feature = "async-oracle")]
pub use producer::{AttestationProducer, Clock, FixedClock, SystemClock, TrustedClients};
