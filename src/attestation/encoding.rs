//! Canonical message encoding.
//!
//! The signed message is exactly 16 bytes: the price as a little-endian `u64`
//! followed by the timestamp as a little-endian `i64` (two's complement). No
//! version tag, length prefix or padding. Producer and consumer both go
//! through this module, so the layout exists in one place only.

use crate::error::{Error, Result};
use crate::utils::constants::{MESSAGE_LENGTH, PRICE_FIELD_LENGTH};
use crate::utils::crypto::Hash;

// ═══════════════════════════════════════════════════════════════════════════════
// CANONICAL MESSAGE
// ═══════════════════════════════════════════════════════════════════════════════

/// The fixed 16-byte encoding of an attested `(price, timestamp)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalMessage([u8; MESSAGE_LENGTH]);

impl CanonicalMessage {
    /// Encode a price and timestamp
    pub fn new(price: u64, timestamp: i64) -> Self {
        let mut bytes = [0u8; MESSAGE_LENGTH];
        bytes[..PRICE_FIELD_LENGTH].copy_from_slice(&price.to_le_bytes());
        bytes[PRICE_FIELD_LENGTH..].copy_from_slice(&timestamp.to_le_bytes());
        Self(bytes)
    }

    /// Parse an encoded message back into its fields
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; MESSAGE_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidInput {
            name: "message",
            expected: MESSAGE_LENGTH,
            got: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Encoded price field
    pub fn price(&self) -> u64 {
        let mut field = [0u8; PRICE_FIELD_LENGTH];
        field.copy_from_slice(&self.0[..PRICE_FIELD_LENGTH]);
        u64::from_le_bytes(field)
    }

    /// Encoded timestamp field
    pub fn timestamp(&self) -> i64 {
        let mut field = [0u8; MESSAGE_LENGTH - PRICE_FIELD_LENGTH];
        field.copy_from_slice(&self.0[PRICE_FIELD_LENGTH..]);
        i64::from_le_bytes(field)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; MESSAGE_LENGTH] {
        &self.0
    }

    /// Keccak-256 digest of the message, the value that gets signed
    pub fn hash(&self) -> Hash {
        Hash::keccak256(&self.0)
    }
}

impl AsRef<[u8]> for CanonicalMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode `(price, timestamp)` into the canonical 16-byte layout
pub fn encode_price_message(price: u64, timestamp: i64) -> [u8; MESSAGE_LENGTH] {
    *CanonicalMessage::new(price, timestamp).as_bytes()
}

/// Digest the oracle signs for `(price, timestamp)`
pub fn message_hash(price: u64, timestamp: i64) -> Hash {
    CanonicalMessage::new(price, timestamp).hash()
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_golden_encoding() {
        let message = CanonicalMessage::new(1_234_560_000, 1_700_000_000);
        assert_eq!(
            message.as_bytes(),
            &[
                0x00, 0xE4, 0x95, 0x49, 0x00, 0x00, 0x00, 0x00, // price
                0x00, 0xF1, 0x53, 0x65, 0x00, 0x00, 0x00, 0x00, // timestamp
            ]
        );
    }

    #[test]
    fn test_golden_hash() {
        assert_eq!(
            message_hash(1_234_560_000, 1_700_000_000).to_hex(),
            "9b7580821d1dd203c1afb6729c76e0c2e30c85783f116b465d0daf8f9aa12cbc"
        );
        assert_eq!(
            message_hash(0, 0).to_hex(),
            "f490de2920c8a35fabeb13208852aa28c76f9be9b03a4dd2b3c075f7a26923b4"
        );
    }

    #[test]
    fn test_negative_timestamp_is_twos_complement() {
        let message = CanonicalMessage::new(1, -1);
        assert_eq!(hex::encode(message.as_bytes()), "0100000000000000ffffffffffffffff");
        assert_eq!(
            message.hash().to_hex(),
            "e5d7f8214b72249105aeafcb7ba343dcb8302828a564337f18241793820f56da"
        );
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert!(matches!(
            CanonicalMessage::from_bytes(&[0u8; 15]),
            Err(Error::InvalidInput { name: "message", expected: 16, got: 15 })
        ));
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic(price: u64, timestamp: i64) {
            prop_assert_eq!(message_hash(price, timestamp), message_hash(price, timestamp));
        }

        #[test]
        fn prop_fields_survive_encoding(price: u64, timestamp: i64) {
            let decoded = CanonicalMessage::from_bytes(&encode_price_message(price, timestamp)).unwrap();
            prop_assert_eq!(decoded.price(), price);
            prop_assert_eq!(decoded.timestamp(), timestamp);
        }

        #[test]
        fn prop_distinct_pairs_hash_differently(a: (u64, i64), b: (u64, i64)) {
            prop_assume!(a != b);
            prop_assert_ne!(message_hash(a.0, a.1), message_hash(b.0, b.1));
        }
    }
}
