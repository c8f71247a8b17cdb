//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::info;

use super::AppConfig;
use crate::domain::Address;

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    chain_id = config.network.chain_id,
    registry = %config.network.registry_address,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Well-formed registry and probe addresses
/// - A parseable http(s) provider URL
/// - Non-zero chain id and call timeout
/// - Sensible throttling limits
fn validate_config(config: &AppConfig) -> Result<()> {
  let network = &config.network;

  Address::parse(&network.registry_address)
    .with_context(|| format!("Invalid registry_address: {}", network.registry_address))?;

  anyhow::ensure!(
    !network.provider_url.is_empty(),
    "provider_url must not be empty"
  );
  let url = Url::parse(&network.provider_url)
    .with_context(|| format!("Invalid provider_url: {}", network.provider_url))?;
  anyhow::ensure!(
    matches!(url.scheme(), "http" | "https"),
    "provider_url must be http(s), got {}",
    url.scheme()
  );

  anyhow::ensure!(network.chain_id > 0, "chain_id must be positive");
  anyhow::ensure!(
    network.call_timeout_ms > 0,
    "call_timeout_ms must be positive"
  );
  anyhow::ensure!(
    network.max_calls_per_second > 0 && network.max_calls_per_second <= 1_000,
    "max_calls_per_second must be in (0, 1000], got {}",
    network.max_calls_per_second
  );

  if let Some(market) = &config.probe.market_address {
    Address::parse(market).with_context(|| format!("Invalid probe market_address: {market}"))?;
  }

  Ok(())
}
