//! The signed price record and its JSON wire form.
//!
//! On the wire every field is a string: `price` and `timestamp` as decimal
//! integers, `signature` as lowercase hex. A record with any field missing or
//! unparseable is rejected whole.

use serde::{Deserialize, Serialize};

use crate::attestation::encoding::CanonicalMessage;
use crate::error::{Error, Result};
use crate::utils::crypto::{Hash, PublicKey, Signature};
use crate::utils::math::format_micro_units;

// ═══════════════════════════════════════════════════════════════════════════════
// ATTESTED PRICE
// ═══════════════════════════════════════════════════════════════════════════════

/// A price and timestamp signed by the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord", into = "WireRecord")]
pub struct AttestedPrice {
    price: u64,
    timestamp: i64,
    signature: Signature,
}

impl AttestedPrice {
    /// Assemble a record from its parts.
    ///
    /// No verification happens here; see [`AttestedPrice::verify`].
    pub fn new(price: u64, timestamp: i64, signature: Signature) -> Self {
        Self {
            price,
            timestamp,
            signature,
        }
    }

    /// Price in micro-dollars (USD x 1,000,000)
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Unix seconds at signing time
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Oracle signature over [`AttestedPrice::message_hash`]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Price formatted as a decimal USD string
    pub fn format_price(&self) -> String {
        format_micro_units(self.price)
    }

    /// Canonical message this record's signature covers
    pub fn message(&self) -> CanonicalMessage {
        CanonicalMessage::new(self.price, self.timestamp)
    }

    /// Reconstruct the digest the oracle signed
    pub fn message_hash(&self) -> Hash {
        self.message().hash()
    }

    /// Check the signature against the oracle public key
    pub fn verify(&self, oracle: &PublicKey) -> bool {
        oracle.verify(&self.message_hash(), &self.signature)
    }

    /// Serialize to the JSON wire form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Internal(format!("encode record: {}", e)))
    }

    /// Parse the JSON wire form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// String-encoded JSON shape of [`AttestedPrice`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireRecord {
    price: String,
    timestamp: String,
    signature: String,
}

impl From<AttestedPrice> for WireRecord {
    fn from(record: AttestedPrice) -> Self {
        Self {
            price: record.price.to_string(),
            timestamp: record.timestamp.to_string(),
            signature: record.signature.to_hex(),
        }
    }
}

impl TryFrom<WireRecord> for AttestedPrice {
    type Error = Error;

    fn try_from(wire: WireRecord) -> Result<Self> {
        let price = wire
            .price
            .parse::<u64>()
            .map_err(|e| Error::MalformedResponse(format!("failed to parse price: {}", e)))?;
        let timestamp = wire
            .timestamp
            .parse::<i64>()
            .map_err(|e| Error::MalformedResponse(format!("failed to parse timestamp: {}", e)))?;
        let signature = Signature::from_hex(&wire.signature).map_err(|e| {
            Error::MalformedResponse(format!("failed to decode signature: {}", e))
        })?;

        Ok(Self::new(price, timestamp, signature))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
