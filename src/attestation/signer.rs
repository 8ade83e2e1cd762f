//! Producer-side signing.

use tracing::debug;

use crate::attestation::encoding::message_hash;
use crate::attestation::record::AttestedPrice;
use crate::utils::crypto::{OracleKeypair, PublicKey};

/// Binds the oracle identity to price messages.
///
/// Holds the only copy of the key the producer uses; it is handed in by the
/// caller and never read from ambient state.
#[derive(Debug, Clone)]
pub struct PriceSigner {
    keypair: OracleKeypair,
}

impl PriceSigner {
    /// Create a signer from the oracle keypair
    pub fn new(keypair: OracleKeypair) -> Self {
        Self { keypair }
    }

    /// Public key consumers verify against
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Encode, hash and sign `(price, timestamp)`
    pub fn sign(&self, price: u64, timestamp: i64) -> AttestedPrice {
        let digest = message_hash(price, timestamp);
        let signature = self.keypair.sign(&digest);
        debug!(price, timestamp, digest = %digest, "signed price message");
        AttestedPrice::new(price, timestamp, signature)
    }
}
