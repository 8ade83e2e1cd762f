//! # Arkham Oracle
//!
//! Signed price attestations for on-chain consumers.
//!
//! A producer fetches a token's USD price, converts it to integer
//! micro-dollars, pairs it with a Unix timestamp and signs the Keccak-256
//! digest of their 16-byte little-endian encoding with Ed25519. Consumers
//! rebuild the digest from the record and check the signature against the
//! oracle's public key.
//!
//! ## Modules
//!
//! - **Attestation**: canonical encoding, the signed record, signing and verification
//! - **Oracle**: price sources, the producer flow and the consumer client
//! - **RPC**: the producer's HTTP endpoint (feature `rpc-server`)
//! - **CLI**: configuration and output formatting for the binaries
//!
//! ## Example
//!
//! ```rust
//! use arkham_oracle::prelude::*;
//!
//! let signer = PriceSigner::new(OracleKeypair::generate());
//! let record = signer.sign(150_250_000, 1_700_000_000);
//!
//! assert_eq!(record.message_hash(), message_hash(150_250_000, 1_700_000_000));
//! assert!(record.verify(&signer.public_key()));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod attestation;
pub mod cli;
pub mod error;
pub mod oracle;
#[cfg(feature = "rpc-server")]
pub mod rpc;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attestation::{
        encode_price_message, message_hash, verify_attestation, AttestedPrice, CanonicalMessage,
        PriceSigner,
    };
    pub use crate::error::{Error, Result};
    pub use crate::utils::{
        crypto::{Hash, OracleKeypair, PublicKey, Signature},
        math::{format_micro_units, usd_to_micro_units},
    };

    #[cfg(feature = "async-oracle")]
    pub use crate::oracle::{AttestationProducer, OracleClient, PriceSource};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol name
pub const PROTOCOL_NAME: &str = "arkham-oracle";
