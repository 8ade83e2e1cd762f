//! Cryptographic primitives for the oracle.
//!
//! This module provides the two primitives the attestation protocol is built
//! on:
//! - Hashes (legacy Keccak-256, the pre-NIST padding)
//! - Ed25519 keypairs, public keys and signatures
//!
//! The slice-based [`sign_digest`] and [`verify_digest`] functions are the
//! length-checked entry points for key material arriving from outside the
//! process (config files, CLI flags, foreign callers).

use ed25519_dalek::{
    Signature as Ed25519Signature, Signer, SigningKey, Verifier, VerifyingKey,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::{Error, Result};
use crate::utils::constants::{HASH_LENGTH, PRIVATE_KEY_LENGTH, PUBKEY_LENGTH, SIGNATURE_LENGTH};

/// Copy a slice into a fixed array, reporting the mismatch as [`Error::InvalidInput`]
fn fixed_bytes<const N: usize>(name: &'static str, slice: &[u8]) -> Result<[u8; N]> {
    slice.try_into().map_err(|_| Error::InvalidInput {
        name,
        expected: N,
        got: slice.len(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// HASH
// ═══════════════════════════════════════════════════════════════════════════════

/// A 32-byte message digest
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash([u8; HASH_LENGTH]);

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Hash {
    /// Create a new hash from bytes
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create a hash from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        fixed_bytes("digest", slice).map(Self)
    }

    /// Compute the legacy Keccak-256 hash of data.
    ///
    /// This is the original Keccak submission padding (`0x01`), as used by
    /// Ethereum, not FIPS-202 SHA3-256.
    pub fn keccak256(data: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; HASH_LENGTH];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Get the hash as bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::MalformedResponse(format!("digest hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEYPAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// The oracle's long-term Ed25519 identity.
///
/// Encoded as 64 bytes: the 32-byte seed followed by the 32-byte public key,
/// the layout used by Solana keypair files.
#[derive(Clone)]
pub struct OracleKeypair {
    inner: SigningKey,
}

impl OracleKeypair {
    /// Create a keypair from its 64-byte encoding.
    ///
    /// The trailing half must be the public key derived from the seed.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self> {
        let inner = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| Error::InvalidKey(format!("keypair bytes rejected: {}", e)))?;
        Ok(Self { inner })
    }

    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; PRIVATE_KEY_LENGTH] = slice.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "invalid private key size: expected {}, got {}",
                PRIVATE_KEY_LENGTH,
                slice.len()
            ))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidKey(format!("private key hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Generate a fresh random keypair
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            inner: SigningKey::generate(&mut rng),
        }
    }

    /// Get the 64-byte encoding (SECURITY: contains the seed)
    pub fn to_keypair_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.inner.to_keypair_bytes()
    }

    /// Convert to hex string (SECURITY: be careful with this)
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_keypair_bytes())
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.inner.verifying_key().to_bytes())
    }

    /// Sign a digest
    pub fn sign(&self, digest: &Hash) -> Signature {
        Signature(self.inner.sign(digest.as_bytes()).to_bytes())
    }

    /// Verify a signature made by this keypair
    pub fn verify(&self, digest: &Hash, signature: &Signature) -> bool {
        self.public_key().verify(digest, signature)
    }
}

impl fmt::Debug for OracleKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OracleKeypair({:?}, [REDACTED])", self.public_key())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// An Ed25519 public key (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBKEY_LENGTH]);

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl PublicKey {
    /// Create a new public key from bytes (not checked to be a curve point)
    pub fn new(bytes: [u8; PUBKEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        fixed_bytes("public_key", slice).map(Self)
    }

    /// Get the public key as bytes
    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidKey(format!("public key hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    /// Check that the bytes decode to a point on the curve
    pub fn is_valid(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `false` for any mismatch, including key bytes that do not
    /// decode to a curve point.
    pub fn verify(&self, digest: &Hash, signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let sig = Ed25519Signature::from_bytes(signature.as_bytes());
        key.verify(digest.as_bytes(), &sig).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNATURE
// ═══════════════════════════════════════════════════════════════════════════════

/// An Ed25519 signature (64 bytes)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Signature {
    /// Create a new signature from bytes
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        fixed_bytes("signature", slice).map(Self)
    }

    /// Get the signature as bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string (either case)
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::MalformedResponse(format!("signature hex: {}", e)))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW SIGN / VERIFY
// ═══════════════════════════════════════════════════════════════════════════════

/// Sign a digest with raw 64-byte key material.
///
/// Fails with [`Error::InvalidKey`] when the key is not exactly 64 bytes or
/// its public half does not match its seed.
pub fn sign_digest(private_key: &[u8], digest: &Hash) -> Result<Signature> {
    let keypair = OracleKeypair::from_slice(private_key)?;
    Ok(keypair.sign(digest))
}

/// Verify a signature over a digest using raw byte slices.
///
/// Mismatches return `Ok(false)`. Only wrong-sized inputs are errors.
pub fn verify_digest(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool> {
    let public_key = PublicKey::from_slice(public_key)?;
    let digest = Hash::from_slice(digest)?;
    let signature = Signature::from_slice(signature)?;
    Ok(public_key.verify(&digest, &signature))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
