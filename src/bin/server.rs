//! Arkham Oracle Server
//!
//! Serves signed price attestations over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use arkham_oracle::cli::config::{
    OracleConfig, ENV_BIND, ENV_DATA_SOURCE_URL, ENV_TIMEOUT, ENV_TRUSTED_CLIENT_KEYS,
};
use arkham_oracle::rpc::{router, AppState};
use arkham_oracle::utils::constants::PRICE_ENDPOINT_PATH;

/// Arkham Oracle price attestation server
#[derive(Parser)]
#[command(name = "arkham-oracle-server")]
#[command(version = arkham_oracle::VERSION)]
#[command(about = "HTTP endpoint issuing signed price attestations", long_about = None)]
struct Args {
    /// JSON config file (defaults to ~/.arkham-oracle/config.json when present);
    /// environment variables override its values
    #[arg(short, long, env = "ORACLE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = ENV_BIND)]
    bind: Option<String>,

    /// Price source URL (CoinGecko-compatible)
    #[arg(long, env = ENV_DATA_SOURCE_URL)]
    data_source_url: Option<String>,

    /// Comma-separated caller identifiers; empty leaves the endpoint public
    #[arg(long, env = ENV_TRUSTED_CLIENT_KEYS, value_delimiter = ',')]
    trusted_client_keys: Vec<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT)]
    timeout: Option<u64>,
}

impl Args {
    /// Layer command-line and environment values over the file (or env) config
    fn into_config(self) -> anyhow::Result<OracleConfig> {
        let mut config = OracleConfig::load_layered(self.config)
            .context("failed to load configuration")?;

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(url) = self.data_source_url.filter(|url| !url.is_empty()) {
            config.data_source_url = Some(url);
        }
        let keys: Vec<String> = self
            .trusted_client_keys
            .into_iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
        if !keys.is_empty() {
            config.trusted_client_keys = keys;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        config.validate()?;
        Ok(config)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let producer = config
        .producer()
        .context("cannot start without a valid oracle private key")?;

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr))?;

    info!("Starting arkham-oracle server on {}", addr);
    info!("Oracle public key: {}", producer.public_key());
    if producer.trusted_clients().is_public() {
        info!("No trusted client keys configured; endpoint is public");
    } else {
        info!("Accepting {} trusted client keys", producer.trusted_clients().len());
    }
    info!("API endpoints:");
    info!("  GET  /health              - Health check");
    info!("  GET  {}            - Signed price (?token=&trustedClientKey=)", PRICE_ENDPOINT_PATH);

    let app = router(AppState::new(producer));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
