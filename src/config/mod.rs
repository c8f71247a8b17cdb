//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`.
//! All contract addresses and chain parameters are externalized
//! here - nothing is hardcoded in the domain layer.

pub mod loader;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `config.toml` at startup and validated before any
/// provider is created.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
  /// Client identity and logging.
  pub client: ClientConfig,
  /// Deployment the client talks to.
  pub network: NetworkConfig,
  /// Inputs for the probe binary.
  #[serde(default)]
  pub probe: ProbeConfig,
}

/// Client identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
  /// Human-readable name used in logs.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Per-deployment constants.
///
/// Immutable once handed to a client. The registry address is kept as
/// text here and validated when the client is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
  /// MARKET contract registry address.
  pub registry_address: String,
  /// Expected EVM chain id (4 = Rinkeby).
  pub chain_id: u64,
  /// JSON-RPC endpoint.
  pub provider_url: String,
  /// Default deadline for a single contract call (milliseconds).
  #[serde(default = "default_call_timeout")]
  pub call_timeout_ms: u64,
  /// Upper bound on outgoing RPC calls per second.
  #[serde(default = "default_max_calls")]
  pub max_calls_per_second: u32,
}

/// Probe binary inputs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeConfig {
  /// Market whose collateral pool and oracle query are looked up.
  pub market_address: Option<String>,
}

// Default value functions for serde

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_call_timeout() -> u64 {
  30_000
}

const fn default_max_calls() -> u32 {
  10
}
