//! Cryptalias CLI
//!
//! Command-line interface for resolving `[ticker:]alias$domain` identifiers
//! into signed wallet addresses.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cryptalias_client::{ClientConfig, CryptaliasResolver, ExpiryGuard, SystemClock};
use cryptalias_core::types::{Jwk, ParsedAlias};
use cryptalias_core::CryptaliasError;

/// Cryptalias - human-readable wallet aliases with signed resolution
#[derive(Parser)]
#[command(name = "cryptalias")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CRYPTALIAS_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Discovery scheme ("https", or "http" for local testing)
    #[arg(long, global = true, env = "CRYPTALIAS_DISCOVERY_SCHEME")]
    scheme: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an alias to a verified wallet address
    Resolve {
        /// Ticker of the wanted currency (e.g. xmr)
        ticker: String,
        /// Alias in the form [ticker:]alias$domain
        alias: String,
        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and check a domain's well-known configuration
    Discover {
        /// Domain to inspect
        domain: String,
    },

    /// Parse an alias without touching the network
    Parse {
        /// Alias in the form [ticker:]alias$domain
        alias: String,
        /// Also check the embedded ticker prefix against this ticker
        #[arg(long)]
        ticker: Option<String>,
    },

    /// Verify a compact JWS offline against a JWK
    Verify {
        /// File holding the compact JWS ("-" for stdin)
        #[arg(long)]
        jws: PathBuf,
        /// File holding the JWK, or a whole configuration document
        #[arg(long)]
        jwk: PathBuf,
        /// Skip the expiry check
        #[arg(long)]
        ignore_expiry: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "cryptalias=debug,info"
    } else {
        "cryptalias=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(scheme) = cli.scheme {
        config = config.with_discovery_scheme(scheme);
    }
    debug!(?config, "Client configuration");

    let result = match cli.command {
        Commands::Resolve { ticker, alias, json } => cmd_resolve(config, &ticker, &alias, json).await,
        Commands::Discover { domain } => cmd_discover(config, &domain).await,
        Commands::Parse { alias, ticker } => cmd_parse(&alias, ticker.as_deref()),
        Commands::Verify { jws, jwk, ignore_expiry } => cmd_verify(&jws, &jwk, ignore_expiry),
    };

    if let Err(err) = &result {
        if let Some(cause) = err.chain().find_map(|e| e.downcast_ref::<CryptaliasError>()) {
            eprintln!("{} {}", "error kind:".red().bold(), cause.kind());
        }
    }
    result
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Resolve an alias
async fn cmd_resolve(config: ClientConfig, ticker: &str, alias: &str, json: bool) -> Result<()> {
    let resolver = CryptaliasResolver::with_config(config).context("Invalid client configuration")?;

    let pb = spinner(format!("Resolving {alias}"))?;
    let result = resolver.resolve(ticker, alias).await;
    pb.finish_and_clear();

    let resolution = result.with_context(|| format!("Failed to resolve {alias}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("{} {}", "✅ Resolved:".green().bold(), alias);
    println!("   {} {}", "Address:".yellow(), resolution.address);
    println!("   {} {}", "Expires:".dimmed(), resolution.expires.to_rfc3339());
    println!("   {} {}", "Resolver:".dimmed(), resolution.resolver_endpoint);
    if let Some(nonce) = &resolution.nonce {
        println!("   {} {}", "Nonce:".dimmed(), nonce);
    }

    Ok(())
}

/// Inspect a domain's configuration
async fn cmd_discover(config: ClientConfig, domain: &str) -> Result<()> {
    let resolver = CryptaliasResolver::with_config(config).context("Invalid client configuration")?;
    println!("{} {}", "🔍 Discovering:".cyan().bold(), resolver.configuration_url(domain));

    let discovered = resolver
        .discover(domain)
        .await
        .with_context(|| format!("Failed to discover {domain}"))?;

    println!("\n{}", "✅ Domain configuration:".green().bold());
    if let Some(mode) = &discovered.configuration.resolver_mode {
        println!("   {} {}", "Mode:".dimmed(), mode);
    }
    println!("   {} {}", "Resolver:".yellow(), discovered.resolver_endpoint);
    println!("   {} {} / {}", "Key:".dimmed(), discovered.key.kty, discovered.key.crv);
    println!("   {} {}", "x:".dimmed(), discovered.key.x);
    if let Some(kid) = &discovered.key.kid {
        println!("   {} {}", "kid:".dimmed(), kid);
    }

    match cryptalias_crypto::import_verifying_key(&discovered.key) {
        Ok(_) => println!("\n   {} Key is a usable Ed25519 public key", "✓".green()),
        Err(_) => println!("\n   {} Key is not a usable Ed25519 public key", "❌".red()),
    }

    Ok(())
}

/// Parse an alias offline
fn cmd_parse(alias: &str, ticker: Option<&str>) -> Result<()> {
    let parsed = ParsedAlias::parse(alias).context("Invalid alias")?;

    println!("{} {}", "📋 Alias:".cyan().bold(), parsed);
    println!("   {} {}", "Domain:".yellow(), parsed.domain);
    println!("   {} {}", "Local part:".dimmed(), parsed.local_part());
    println!("   {} {}", "Name:".dimmed(), parsed.name());
    if let Some(tag) = parsed.tag() {
        println!("   {} {}", "Tag:".dimmed(), tag);
    }
    if let Some(prefix) = &parsed.ticker_prefix {
        println!("   {} {}", "Ticker prefix:".dimmed(), prefix);
    }

    if let Some(ticker) = ticker {
        parsed.check_ticker(ticker).context("Ticker check failed")?;
        println!("   {} Usable for {}", "✓".green(), ticker);
    }

    Ok(())
}

/// Verify a saved resolver response
fn cmd_verify(jws_path: &Path, jwk_path: &Path, ignore_expiry: bool) -> Result<()> {
    let compact = read_input(jws_path).context("Failed to read JWS")?;
    let jwk = load_jwk(jwk_path)?;

    let payload = cryptalias_crypto::verify(&compact, &jwk).context("Verification failed")?;
    println!("{}", "✅ Signature valid".green().bold());

    if ignore_expiry {
        println!("   {}", "Expiry not checked".yellow());
    } else {
        let expires = ExpiryGuard::new(Arc::new(SystemClock))
            .enforce(payload.expires.as_deref())
            .context("Expiry check failed")?;
        println!("   {} {}", "Valid until:".dimmed(), expires.to_rfc3339());
    }

    println!("\n{}", "Payload (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to open {}", path.display()))
    }
}

/// Accepts a bare JWK or a configuration document carrying one under `key`.
fn load_jwk(path: &Path) -> Result<Jwk> {
    let value: serde_json::Value = serde_json::from_str(&read_input(path)?).context("JWK file is not JSON")?;
    let key = match value.get("key") {
        Some(key) => key.clone(),
        None => value,
    };
    serde_json::from_value(key).context("JWK file does not hold a JWK")
}
