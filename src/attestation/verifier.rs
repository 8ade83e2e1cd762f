//! Consumer-side verification.
//!
//! The verifying party is usually a third system (an on-chain program holding
//! the oracle key). These helpers give off-chain consumers the same check.

use crate::attestation::encoding::message_hash;
use crate::attestation::record::AttestedPrice;
use crate::error::{Error, Result};
use crate::utils::crypto::{verify_digest, PublicKey};

/// Verify a price attestation from raw parts.
///
/// Wrong-sized key or signature is an error; a signature that simply does
/// not match is `Ok(false)`.
pub fn verify_attestation(
    public_key: &[u8],
    price: u64,
    timestamp: i64,
    signature: &[u8],
) -> Result<bool> {
    let digest = message_hash(price, timestamp);
    verify_digest(public_key, digest.as_bytes(), signature)
}

/// Return the record if it verifies, [`Error::InvalidSignature`] otherwise
pub fn require_valid(record: AttestedPrice, oracle: &PublicKey) -> Result<AttestedPrice> {
    if record.verify(oracle) {
        Ok(record)
    } else {
        Err(Error::InvalidSignature)
    }
}
