//! MARKET Registry Client — Library Root
//!
//! Read-only lookups against MARKET protocol contracts: the registry
//! whitelist, a market's collateral pool and its oracle query.
//! Re-exports all modules for integration tests.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

pub use domain::{Address, MarketError, OracleQuery, ProviderError};
pub use ports::{CallOptions, CallRequest, ChainProvider};
pub use usecases::MarketClient;
