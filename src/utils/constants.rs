//! Protocol constants.
//!
//! Byte lengths and scaling factors are part of the signed wire format;
//! changing any of them breaks verification of every existing attestation.

// ═══════════════════════════════════════════════════════════════════════════════
// PRICE CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Decimal places carried by an attested price
pub const PRICE_DECIMALS: u32 = 6;

/// Fixed-point scale (1 USD = 1,000,000 micro-units)
pub const PRICE_SCALE: u64 = 1_000_000;

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODING CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Encoded price width (u64, little-endian)
pub const PRICE_FIELD_LENGTH: usize = 8;

/// Encoded timestamp width (i64, little-endian)
pub const TIMESTAMP_FIELD_LENGTH: usize = 8;

/// Canonical message length
pub const MESSAGE_LENGTH: usize = PRICE_FIELD_LENGTH + TIMESTAMP_FIELD_LENGTH;

// ═══════════════════════════════════════════════════════════════════════════════
// CRYPTOGRAPHIC CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Keccak-256 digest length
pub const HASH_LENGTH: usize = 32;

/// Ed25519 signature length
pub const SIGNATURE_LENGTH: usize = 64;

/// Ed25519 public key length
pub const PUBKEY_LENGTH: usize = 32;

/// Ed25519 private key length (32-byte seed followed by the public key)
pub const PRIVATE_KEY_LENGTH: usize = 64;

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Price source used when none is configured
pub const DEFAULT_PRICE_SOURCE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Quote currency requested from the price source
pub const QUOTE_CURRENCY: &str = "usd";

/// Producer endpoint path
pub const PRICE_ENDPOINT_PATH: &str = "/api/price";

/// Query parameter carrying the token identifier
pub const TOKEN_PARAM: &str = "token";

/// Query parameter carrying the caller identifier
pub const TRUSTED_CLIENT_KEY_PARAM: &str = "trustedClientKey";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_matches_decimals() {
        assert_eq!(PRICE_SCALE, 10u64.pow(PRICE_DECIMALS));
    }

    #[test]
    fn test_message_length() {
        assert_eq!(MESSAGE_LENGTH, 16);
        assert_eq!(PRIVATE_KEY_LENGTH, 2 * PUBKEY_LENGTH);
    }
}
