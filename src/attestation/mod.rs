//! Price attestation protocol.
//!
//! The pieces both roles share:
//! - Canonical 16-byte message encoding and its Keccak-256 digest
//! - The signed record and its JSON wire form
//! - Producer-side signing
//! - Consumer-side verification
//!
//! ## Usage
//!
//! ```rust
//! use arkham_oracle::attestation::{PriceSigner, AttestedPrice};
//! use arkham_oracle::utils::crypto::OracleKeypair;
//!
//! let signer = PriceSigner::new(OracleKeypair::generate());
//! let record = signer.sign(150_250_000, 1_700_000_000);
//!
//! let wire = record.to_json().unwrap();
//! let received = AttestedPrice::from_json(&wire).unwrap();
//! assert!(received.verify(&signer.public_key()));
//! ```

pub mod encoding;
pub mod record;
pub mod signer;
pub mod verifier;

pub use encoding::{encode_price_message, message_hash, CanonicalMessage};
pub use record::AttestedPrice;
pub use signer::PriceSigner;
pub use verifier::{require_valid, verify_attestation};
