//! Oracle Configuration.
//!
//! Configuration for the producer endpoint: signing key, allow-list, price
//! source and listener. Loaded from a JSON file or from `ORACLE_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::oracle::fetchers::HttpFetcherConfig;
use crate::utils::crypto::OracleKeypair;
#[cfg(feature = "async-oracle")]
use crate::{
    attestation::PriceSigner,
    oracle::{fetchers::HttpPriceSource, producer::AttestationProducer},
};
#[cfg(feature = "async-oracle")]
use std::sync::Arc;

/// Environment variable holding the hex-encoded 64-byte private key
pub const ENV_PRIVATE_KEY: &str = "ORACLE_PRIVATE_KEY";
/// Environment variable holding comma-separated caller identifiers
pub const ENV_TRUSTED_CLIENT_KEYS: &str = "ORACLE_TRUSTED_CLIENT_KEYS";
/// Environment variable overriding the price source URL
pub const ENV_DATA_SOURCE_URL: &str = "ORACLE_DATA_SOURCE_URL";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "ORACLE_BIND";
/// Environment variable overriding the upstream timeout
pub const ENV_TIMEOUT: &str = "ORACLE_TIMEOUT";

// ═══════════════════════════════════════════════════════════════════════════════
// ORACLE CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Oracle configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Hex-encoded 64-byte Ed25519 private key (seed followed by public key)
    pub private_key: Option<String>,
    /// Caller identifiers allowed to request prices; empty means public
    pub trusted_client_keys: Vec<String>,
    /// Alternate price source URL; `None` uses CoinGecko
    pub data_source_url: Option<String>,
    /// Listen address for the producer endpoint
    pub bind_addr: String,
    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            trusted_client_keys: Vec::new(),
            data_source_url: None,
            bind_addr: "0.0.0.0:8080".into(),
            timeout_secs: 10,
        }
    }
}

impl OracleConfig {
    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup);
        config
    }

    /// Override fields with whichever `ORACLE_*` variables are set
    pub fn apply_env(&mut self) {
        self.apply_lookup(|name| std::env::var(name).ok());
    }

    /// Override fields from an arbitrary variable lookup
    pub fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_PRIVATE_KEY) {
            self.private_key = Some(key);
        }

        if let Some(keys) = lookup(ENV_TRUSTED_CLIENT_KEYS) {
            self.trusted_client_keys = parse_key_list(&keys);
        }

        if let Some(url) = lookup(ENV_DATA_SOURCE_URL).filter(|url| !url.is_empty()) {
            self.data_source_url = Some(url);
        }

        if let Some(bind) = lookup(ENV_BIND) {
            self.bind_addr = bind;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            if let Ok(secs) = timeout.parse() {
                self.timeout_secs = secs;
            }
        }
    }

    /// Get default config file path (`$HOME/.arkham-oracle/config.json`)
    pub fn default_path() -> PathBuf {
        default_data_dir().join("config.json")
    }

    /// Config file to load: the explicit path, else `fallback` if it exists
    pub fn resolve_path(explicit: Option<PathBuf>, fallback: PathBuf) -> Option<PathBuf> {
        explicit.or_else(|| fallback.is_file().then_some(fallback))
    }

    /// Load the resolved config file (or defaults), then apply the environment
    pub fn load_layered(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match Self::resolve_path(explicit, Self::default_path()) {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// HTTP settings for the price source, with the configured timeout
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig::with_timeout_secs(self.timeout_secs)
    }

    /// Build the attestation producer this configuration describes.
    ///
    /// Fails with [`Error::InvalidKey`] when the configured key is unusable.
    #[cfg(feature = "async-oracle")]
    pub fn producer(&self) -> crate::error::Result<AttestationProducer> {
        let signer = PriceSigner::new(self.keypair()?);
        let source = HttpPriceSource::new(self.data_source_url.clone(), &self.fetcher_config())?;

        Ok(AttestationProducer::new(signer, Arc::new(source))
            .with_trusted_clients(self.trusted_client_keys.iter().cloned()))
    }

    /// Decode the configured signing key
    pub fn keypair(&self) -> crate::error::Result<OracleKeypair> {
        let hex = self
            .private_key
            .as_deref()
            .ok_or_else(|| Error::InvalidKey("oracle private key is not configured".into()))?;
        OracleKeypair::from_hex(hex)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.is_empty() {
            return Err(ConfigError::Validation("Bind address cannot be empty".into()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("Timeout must be greater than 0".into()));
        }

        if self.private_key.is_some() {
            self.keypair()
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("trusted_client_keys", &self.trusted_client_keys.len())
            .field("data_source_url", &self.data_source_url)
            .field("bind_addr", &self.bind_addr)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Parse error
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// Validation error
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPER FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Split a comma-separated key list, dropping blanks
fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}

/// Get default data directory
fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".arkham-oracle");
    }

    PathBuf::from(".arkham-oracle")
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = OracleConfig::default();
        assert!(config.trusted_client_keys.is_empty());
        assert!(config.data_source_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let keypair = OracleKeypair::generate();
        let config = OracleConfig::from_lookup(lookup(&[
            (ENV_PRIVATE_KEY, &keypair.to_hex()),
            (ENV_TRUSTED_CLIENT_KEYS, "k1, k2,,"),
            (ENV_DATA_SOURCE_URL, "http://prices.local/simple/price"),
            (ENV_BIND, "127.0.0.1:9000"),
            (ENV_TIMEOUT, "3"),
        ]));

        assert_eq!(config.trusted_client_keys, vec!["k1", "k2"]);
        assert_eq!(config.data_source_url.as_deref(), Some("http://prices.local/simple/price"));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.keypair().unwrap().public_key(), keypair.public_key());
    }

    #[test]
    fn test_empty_data_source_means_default() {
        let config = OracleConfig::from_lookup(lookup(&[(ENV_DATA_SOURCE_URL, "")]));
        assert!(config.data_source_url.is_none());
    }

    #[test]
    fn test_missing_key_is_invalid_key() {
        let config = OracleConfig::default();
        assert!(matches!(config.keypair(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = OracleConfig::default();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = OracleConfig::default();
        config.private_key = Some("00".repeat(32));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = OracleConfig {
            private_key: Some(OracleKeypair::generate().to_hex()),
            trusted_client_keys: vec!["k1".into()],
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = OracleConfig::load(&path).unwrap();
        assert_eq!(loaded.private_key, config.private_key);
        assert_eq!(loaded.trusted_client_keys, config.trusted_client_keys);
        assert_eq!(loaded.bind_addr, config.bind_addr);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"trusted_client_keys":["a"]}"#).unwrap();

        let loaded = OracleConfig::load(&path).unwrap();
        assert_eq!(loaded.trusted_client_keys, vec!["a"]);
        assert_eq!(loaded.timeout_secs, 10);
    }

    #[test]
    fn test_lookup_overrides_file_values() {
        let mut config = OracleConfig {
            trusted_client_keys: vec!["from-file".into()],
            bind_addr: "127.0.0.1:7000".into(),
            ..Default::default()
        };
        config.apply_lookup(lookup(&[(ENV_BIND, "127.0.0.1:9000")]));

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.trusted_client_keys, vec!["from-file"]);
    }

    #[test]
    fn test_resolve_path() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("config.json");
        let explicit = dir.path().join("other.json");

        assert_eq!(OracleConfig::resolve_path(None, fallback.clone()), None);
        assert_eq!(
            OracleConfig::resolve_path(Some(explicit.clone()), fallback.clone()),
            Some(explicit)
        );

        OracleConfig::default().save(&fallback).unwrap();
        assert_eq!(OracleConfig::resolve_path(None, fallback.clone()), Some(fallback));
    }

    #[test]
    fn test_default_path() {
        let path = OracleConfig::default_path();
        assert!(path.ends_with(".arkham-oracle/config.json"));
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let config = OracleConfig {
            timeout_secs: u64::MAX / 10,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.fetcher_config().timeout_ms, Some(u64::MAX));
    }

    #[cfg(feature = "async-oracle")]
    #[test]
    fn test_producer_rejects_bad_key() {
        let config = OracleConfig {
            private_key: Some("abcd".into()),
            ..Default::default()
        };
        assert!(matches!(config.producer(), Err(Error::InvalidKey(_))));
    }

    #[cfg(feature = "async-oracle")]
    #[test]
    fn test_producer_applies_allow_list() {
        let keypair = OracleKeypair::generate();
        let config = OracleConfig {
            private_key: Some(keypair.to_hex()),
            trusted_client_keys: vec!["k1".into()],
            timeout_secs: u64::MAX / 10,
            ..Default::default()
        };

        let producer = config.producer().unwrap();
        assert_eq!(producer.public_key(), keypair.public_key());
        assert!(producer.authorize(Some("k1")).is_ok());
        assert_eq!(producer.authorize(Some("k2")), Err(Error::Unauthorized));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = OracleKeypair::generate().to_hex();
        let config = OracleConfig {
            private_key: Some(key.clone()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains(&key));
    }
}
