//! MARKET Registry Client — Probe Entry Point
//!
//! Connects to the configured deployment and prints what the registry
//! and one market contract report.
//!
//! Wiring sequence:
//! 1. Load config.toml (or the path given as first argument) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect the alloy provider (chain id + registry code check)
//! 4. Build the MarketClient over the shared provider
//! 5. Fetch the whitelist, then the collateral pool and oracle query of
//!    the probe market (second argument or `probe.market_address`)
//! 6. Print a JSON summary on stdout

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use market_registry_client::adapters::chain::AlloyChainProvider;
use market_registry_client::adapters::chain::provider::CONNECT_TIMEOUT;
use market_registry_client::config;
use market_registry_client::{Address, MarketClient};

/// What the probe found, printed as JSON.
#[derive(Debug, Serialize)]
struct ProbeReport {
    registry: Address,
    chain_id: u64,
    whitelist: Vec<Address>,
    market: Option<MarketReport>,
}

#[derive(Debug, Serialize)]
struct MarketReport {
    address: Address,
    whitelisted: bool,
    collateral_pool: Address,
    oracle_query: String,
    oracle_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    // ── 1. Load configuration ───────────────────────────────
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.client.log_level)
                }),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!(
        name = %config.client.name,
        version = env!("CARGO_PKG_VERSION"),
        chain_id = config.network.chain_id,
        "Starting MARKET registry probe"
    );

    // ── 3. Connect provider ─────────────────────────────────
    let provider = tokio::time::timeout(
        CONNECT_TIMEOUT,
        AlloyChainProvider::connect(&config.network),
    )
    .await
    .context("Timed out connecting to JSON-RPC endpoint")?
    .context("Failed to connect to JSON-RPC endpoint")?;
    let provider = Arc::new(provider);

    // ── 4. Build client ─────────────────────────────────────
    let client = MarketClient::new(Arc::clone(&provider), config.network.clone())
        .context("Invalid network configuration")?;

    // ── 5. Run lookups ──────────────────────────────────────
    let whitelist = client
        .address_whitelist()
        .await
        .context("Failed to fetch registry whitelist")?;
    info!(entries = whitelist.len(), "Registry whitelist fetched");

    let market = args.next().or(config.probe.market_address);
    let market = match market {
        Some(market) => Some(probe_market(&client, &whitelist, &market).await?),
        None => {
            warn!("No probe market configured — skipping market lookups");
            None
        }
    };

    // ── 6. Report ───────────────────────────────────────────
    let report = ProbeReport {
        registry: client.registry_address(),
        chain_id: provider.chain_id(),
        whitelist,
        market,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    Ok(())
}

/// Resolve collateral pool and oracle query for one market.
async fn probe_market(
    client: &MarketClient<Arc<AlloyChainProvider>>,
    whitelist: &[Address],
    market: &str,
) -> Result<MarketReport> {
    let address = Address::parse(market).context("Invalid market address")?;

    let collateral_pool = client
        .collateral_pool_address(market)
        .await
        .context("Failed to resolve collateral pool")?;

    let oracle_query = client
        .oracle_query(market)
        .await
        .context("Failed to fetch oracle query")?;

    let oracle_url = match oracle_query.url() {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!(error = %e, "Oracle query segment is not a valid URL");
            None
        }
    };

    info!(%address, %collateral_pool, "Market resolved");

    Ok(MarketReport {
        address,
        whitelisted: whitelist.contains(&address),
        collateral_pool,
        oracle_query: oracle_query.into_string(),
        oracle_url,
    })
}
