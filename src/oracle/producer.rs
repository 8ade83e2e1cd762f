//! Attestation producer.
//!
//! Orchestrates one request: gate the caller, look up the raw price, convert
//! it to micro-units, stamp it with the wall clock and sign it. Each call is
//! independent; nothing is cached between requests.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::attestation::{AttestedPrice, PriceSigner};
use crate::error::{Error, Result};
use crate::oracle::fetchers::PriceSource;
use crate::utils::crypto::PublicKey;
use crate::utils::math::usd_to_micro_units;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the attestation timestamp
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ALLOW-LIST
// ═══════════════════════════════════════════════════════════════════════════════

/// Caller identifiers allowed to request attestations.
///
/// An empty list makes the endpoint public.
#[derive(Debug, Clone, Default)]
pub struct TrustedClients {
    keys: HashSet<String>,
}

impl TrustedClients {
    /// Build from configured keys; blank entries are ignored
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(Into::into)
                .filter(|key| !key.is_empty())
                .collect(),
        }
    }

    /// True when no allow-list is configured
    pub fn is_public(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of configured keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no keys are configured
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check whether `caller` may request an attestation
    pub fn allows(&self, caller: Option<&str>) -> bool {
        self.is_public() || caller.is_some_and(|key| self.keys.contains(key))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRODUCER
// ═══════════════════════════════════════════════════════════════════════════════

/// Produces signed price attestations on request
pub struct AttestationProducer {
    signer: PriceSigner,
    source: Arc<dyn PriceSource>,
    trusted: TrustedClients,
    clock: Arc<dyn Clock>,
}

impl AttestationProducer {
    /// Create a public producer using the wall clock
    pub fn new(signer: PriceSigner, source: Arc<dyn PriceSource>) -> Self {
        Self {
            signer,
            source,
            trusted: TrustedClients::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Restrict callers to an allow-list
    pub fn with_trusted_clients<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted = TrustedClients::new(keys);
        self
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Oracle public key
    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    /// Configured allow-list
    pub fn trusted_clients(&self) -> &TrustedClients {
        &self.trusted
    }

    /// Reject callers absent from a non-empty allow-list
    pub fn authorize(&self, caller: Option<&str>) -> Result<()> {
        if self.trusted.allows(caller) {
            Ok(())
        } else {
            warn!("rejected caller not on allow-list");
            Err(Error::Unauthorized)
        }
    }

    /// Produce a signed attestation for `token`.
    ///
    /// The caller is checked before the price source is contacted. A quote
    /// that truncates to zero micro-units is reported as not found.
    pub async fn attest(&self, token: &str, caller: Option<&str>) -> Result<AttestedPrice> {
        self.authorize(caller)?;

        if token.is_empty() {
            return Err(Error::MissingParameter("Token".into()));
        }

        let price_usd = self.source.usd_price(token).await?;
        let price = usd_to_micro_units(price_usd)?;
        if price == 0 {
            debug!(token, price_usd, "zero price treated as not found");
            return Err(Error::PriceNotFound(token.to_string()));
        }

        let timestamp = self.clock.now();
        let record = self.signer.sign(price, timestamp);

        info!(token, price, timestamp, "issued price attestation");
        Ok(record)
    }
}

impl std::fmt::Debug for AttestationProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestationProducer")
            .field("public_key", &self.public_key())
            .field("trusted_clients", &self.trusted.len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
