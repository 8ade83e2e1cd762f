//! Error types for the Arkham oracle.
//!
//! Every failure the producer or consumer can hit is a variant of [`Error`].
//! Each variant carries a stable numeric code and the HTTP status the
//! producer endpoint reports for it.

use thiserror::Error;

/// Result type alias for oracle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the oracle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Key & Input Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Malformed oracle key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Wrong-sized key, digest or signature passed to sign/verify
    #[error("Invalid input {name}: expected {expected} bytes, got {got}")]
    InvalidInput {
        /// Name of the offending argument
        name: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        got: usize,
    },

    /// Signature does not verify against the oracle public key
    #[error("Invalid signature")]
    InvalidSignature,

    // ═══════════════════════════════════════════════════════════════════
    // Request Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Caller identifier absent from the allow-list
    #[error("Unauthorized")]
    Unauthorized,

    /// Required request parameter missing
    #[error("{0} parameter is required")]
    MissingParameter(String),

    // ═══════════════════════════════════════════════════════════════════
    // Price Source Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Upstream price lookup failed (unreachable, non-200, bad body)
    #[error("Price source error: {0}")]
    PriceSource(String),

    /// Token absent from the price source, or priced at zero
    #[error("Price for token '{0}' not found")]
    PriceNotFound(String),

    // ═══════════════════════════════════════════════════════════════════
    // Consumer Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Oracle response could not be turned into a signed record
    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    /// Transport-level failure talking to the oracle endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the caller can retry or correct the request
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized
                | Error::MissingParameter(_)
                | Error::PriceSource(_)
                | Error::PriceNotFound(_)
                | Error::MalformedResponse(_)
                | Error::Transport(_)
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Key & input errors: 1xxx
            Error::InvalidKey(_) => 1001,
            Error::InvalidInput { .. } => 1002,
            Error::InvalidSignature => 1003,

            // Request errors: 2xxx
            Error::Unauthorized => 2001,
            Error::MissingParameter(_) => 2002,

            // Price source errors: 3xxx
            Error::PriceSource(_) => 3001,
            Error::PriceNotFound(_) => 3002,

            // Consumer errors: 4xxx
            Error::MalformedResponse(_) => 4001,
            Error::Transport(_) => 4002,

            // Internal errors: 9xxx
            Error::Config(_) => 9001,
            Error::Internal(_) => 9002,
        }
    }

    /// HTTP status the producer endpoint reports for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::MissingParameter(_) => 400,
            Error::Unauthorized => 401,
            Error::PriceNotFound(_) => 404,
            _ => 500,
        }
    }
}
