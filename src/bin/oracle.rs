//! Arkham Oracle CLI
//!
//! Key generation, offline hashing/signing/verification and the consumer
//! fetch flow.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use arkham_oracle::attestation::{encode_price_message, message_hash, verify_attestation, PriceSigner};
use arkham_oracle::cli::config::{ENV_PRIVATE_KEY, ENV_TIMEOUT};
use arkham_oracle::cli::output::{OutputFormat, OutputFormatter};
use arkham_oracle::oracle::{HttpFetcherConfig, OracleClient};
use arkham_oracle::utils::crypto::{OracleKeypair, PublicKey, Signature};
use arkham_oracle::utils::math::format_micro_units;

/// Arkham Oracle - signed price attestations
#[derive(Parser)]
#[command(name = "arkham-oracle")]
#[command(version = arkham_oracle::VERSION)]
#[command(about = "Sign, verify and fetch oracle price attestations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json, json-pretty, minimal)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new oracle keypair
    Keygen {
        /// Write the keypair as JSON to this file
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },

    /// Print the canonical message and its Keccak-256 digest
    Hash {
        /// Price in micro-dollars
        #[arg(long)]
        price: u64,

        /// Unix timestamp in seconds
        #[arg(long, allow_negative_numbers = true)]
        timestamp: i64,
    },

    /// Sign a price/timestamp pair
    Sign {
        /// Price in micro-dollars
        #[arg(long)]
        price: u64,

        /// Unix timestamp in seconds
        #[arg(long, allow_negative_numbers = true)]
        timestamp: i64,

        /// Hex-encoded 64-byte private key
        #[arg(long, env = ENV_PRIVATE_KEY, hide_env_values = true)]
        private_key: String,
    },

    /// Verify a signed price
    Verify {
        /// Price in micro-dollars
        #[arg(long)]
        price: u64,

        /// Unix timestamp in seconds
        #[arg(long, allow_negative_numbers = true)]
        timestamp: i64,

        /// Hex-encoded 64-byte signature
        #[arg(long)]
        signature: String,

        /// Hex-encoded 32-byte oracle public key
        #[arg(long)]
        public_key: String,
    },

    /// Fetch a signed price from an oracle endpoint
    Fetch {
        /// Oracle endpoint, e.g. http://localhost:8080/api/price
        #[arg(long, env = "ORACLE_URL")]
        url: String,

        /// Token id (e.g. solana)
        #[arg(long)]
        token: String,

        /// Caller identifier for gated oracles
        #[arg(long, env = "ORACLE_TRUSTED_CLIENT_KEY")]
        trusted_key: Option<String>,

        /// Verify the record against this oracle public key
        #[arg(long)]
        public_key: Option<String>,

        /// Request timeout in seconds (none by default)
        #[arg(long, env = ENV_TIMEOUT)]
        timeout: Option<u64>,
    },
}

#[derive(Serialize)]
struct KeypairOutput {
    public_key: String,
    private_key: String,
}

#[derive(Serialize)]
struct HashOutput {
    price: u64,
    timestamp: i64,
    message: String,
    hash: String,
}

#[derive(Serialize)]
struct RecordOutput {
    price: String,
    price_usd: String,
    timestamp: String,
    signature: String,
    hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified: Option<bool>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut output = OutputFormatter::new(cli.format);
    if cli.no_color {
        output = output.without_color();
    }

    if let Err(e) = run_command(cli.command, &output).await {
        if output.format().is_json() {
            output.error(&format!("{:#}", e));
        } else {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
        }
        std::process::exit(1);
    }
}

async fn run_command(command: Commands, output: &OutputFormatter) -> anyhow::Result<()> {
    match command {
        Commands::Keygen { out, force } => keygen(out, force, output),
        Commands::Hash { price, timestamp } => {
            let message = encode_price_message(price, timestamp);
            output.data(&HashOutput {
                price,
                timestamp,
                message: hex::encode(message),
                hash: message_hash(price, timestamp).to_hex(),
            });
            Ok(())
        }
        Commands::Sign { price, timestamp, private_key } => {
            let keypair = OracleKeypair::from_hex(&private_key).context("invalid private key")?;
            let record = PriceSigner::new(keypair).sign(price, timestamp);
            output.data(&RecordOutput {
                price: record.price().to_string(),
                price_usd: record.format_price(),
                timestamp: record.timestamp().to_string(),
                signature: record.signature().to_hex(),
                hash: record.message_hash().to_hex(),
                verified: None,
            });
            Ok(())
        }
        Commands::Verify { price, timestamp, signature, public_key } => {
            let public_key = PublicKey::from_hex(&public_key).context("invalid public key")?;
            let signature = Signature::from_hex(&signature).context("invalid signature")?;

            if verify_attestation(public_key.as_bytes(), price, timestamp, signature.as_bytes())? {
                output.success(&format!(
                    "Valid signature for {} USD at {}",
                    format_micro_units(price),
                    timestamp
                ));
                Ok(())
            } else {
                bail!("signature does not match price {} at {}", price, timestamp)
            }
        }
        Commands::Fetch { url, token, trusted_key, public_key, timeout } => {
            fetch(url, token, trusted_key, public_key, timeout, output).await
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════════

fn keygen(out: Option<PathBuf>, force: bool, output: &OutputFormatter) -> anyhow::Result<()> {
    let keypair = OracleKeypair::generate();
    let keys = KeypairOutput {
        public_key: keypair.public_key().to_hex(),
        private_key: keypair.to_hex(),
    };

    let Some(path) = out else {
        output.data(&keys);
        return Ok(());
    };

    if path.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;
        if !overwrite {
            bail!("refusing to overwrite {}", path.display());
        }
    }

    let json = serde_json::to_string_pretty(&keys)?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    output.kv("public_key", &keys.public_key);
    output.success(&format!("Keypair saved to {}", path.display()));
    Ok(())
}

async fn fetch(
    url: String,
    token: String,
    trusted_key: Option<String>,
    public_key: Option<String>,
    timeout: Option<u64>,
    output: &OutputFormatter,
) -> anyhow::Result<()> {
    let oracle_key = public_key
        .as_deref()
        .map(PublicKey::from_hex)
        .transpose()
        .context("invalid public key")?;

    let config = timeout
        .map(HttpFetcherConfig::with_timeout_secs)
        .unwrap_or_default();
    let mut client = OracleClient::with_config(url, &config)?;
    if let Some(key) = trusted_key {
        client = client.with_trusted_key(key);
    }

    let spinner = (output.format() == OutputFormat::Text)
        .then(|| create_spinner(&format!("Fetching signed price for {}...", token)));

    let result = client.fetch_signed_price(&token).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let record = result.with_context(|| format!("failed to fetch price for {}", token))?;

    let verified = oracle_key.map(|key| record.verify(&key));
    if verified.is_none() && output.format() == OutputFormat::Text {
        output.warning("No --public-key given; signature not checked");
    }
    output.data(&RecordOutput {
        price: record.price().to_string(),
        price_usd: record.format_price(),
        timestamp: record.timestamp().to_string(),
        signature: record.signature().to_hex(),
        hash: record.message_hash().to_hex(),
        verified,
    });

    if verified == Some(false) {
        bail!("signature does not verify against the given oracle key");
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}
