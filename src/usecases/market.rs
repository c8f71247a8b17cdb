//! Market Lookup Use Case - Registry and Market Contract Queries
//!
//! Resolves on-chain references for MARKET protocol deployments:
//! 1. The registry's whitelist of known market contracts
//! 2. The collateral pool contract backing a market
//! 3. The oracle query a market settles against
//!
//! Every call is one request → decode → validate cycle. Nothing is
//! cached, retried or defaulted; failures go straight back to the caller.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::config::NetworkConfig;
use crate::domain::{Address, MarketError, OracleQuery, ProviderError};
use crate::ports::chain_provider::{CallOptions, CallRequest, ChainProvider};
use crate::ports::contracts::{self, MarketContract, MarketContractRegistry};

/// Read-only client for a MARKET protocol deployment.
///
/// Holds the provider handle and an immutable configuration. All methods
/// take `&self` and may be called concurrently.
pub struct MarketClient<P: ChainProvider> {
  provider: P,
  config: NetworkConfig,
  registry: Address,
}

impl<P: ChainProvider> MarketClient<P> {
  /// Create a client. No network call is made.
  ///
  /// # Errors
  /// Returns [`MarketError::InvalidConfiguration`] if the registry address
  /// is malformed or the chain id is zero.
  pub fn new(provider: P, config: NetworkConfig) -> Result<Self, MarketError> {
    let registry = Address::parse(&config.registry_address).map_err(|_| {
      MarketError::InvalidConfiguration(format!(
        "registry_address {:?} is not a valid address",
        config.registry_address
      ))
    })?;

    if config.chain_id == 0 {
      return Err(MarketError::InvalidConfiguration(
        "chain_id must be non-zero".to_string(),
      ));
    }

    Ok(Self {
      provider,
      config,
      registry,
    })
  }

  /// Network configuration this client was built with.
  pub const fn config(&self) -> &NetworkConfig {
    &self.config
  }

  /// Validated registry contract address.
  pub const fn registry_address(&self) -> Address {
    self.registry
  }

  /// Default options: the configured call timeout, no cancellation.
  pub fn default_options(&self) -> CallOptions {
    CallOptions::with_deadline(Duration::from_millis(self.config.call_timeout_ms))
  }

  /// Addresses whitelisted by the registry, in on-chain order.
  pub async fn address_whitelist(&self) -> Result<Vec<Address>, MarketError> {
    self.address_whitelist_with(&self.default_options()).await
  }

  /// [`Self::address_whitelist`] with explicit call options.
  ///
  /// Duplicate entries are kept and logged. An entry that is not a
  /// well-formed address fails the whole call.
  #[instrument(skip(self, opts), fields(registry = %self.registry))]
  pub async fn address_whitelist_with(
    &self,
    opts: &CallOptions,
  ) -> Result<Vec<Address>, MarketError> {
    let data = self
      .call::<MarketContractRegistry::getAddressWhiteListCall>(
        self.registry,
        &MarketContractRegistry::getAddressWhiteListCall {},
        opts,
      )
      .await?;

    let whitelist = contracts::decode_address_array(&data)?;

    let unique = whitelist.iter().collect::<HashSet<_>>().len();
    if unique != whitelist.len() {
      warn!(
        entries = whitelist.len(),
        duplicates = whitelist.len() - unique,
        "Registry whitelist contains duplicate addresses"
      );
    }

    debug!(entries = whitelist.len(), "Whitelist fetched");
    Ok(whitelist)
  }

  /// Whether `market` appears in the registry whitelist.
  pub async fn is_whitelisted(&self, market: &str) -> Result<bool, MarketError> {
    let market = Address::parse(market)?;
    let whitelist = self.address_whitelist().await?;
    Ok(whitelist.contains(&market))
  }

  /// Collateral pool contract of `market`.
  pub async fn collateral_pool_address(&self, market: &str) -> Result<Address, MarketError> {
    self
      .collateral_pool_address_with(market, &self.default_options())
      .await
  }

  /// [`Self::collateral_pool_address`] with explicit call options.
  ///
  /// `market` is validated before any call is made.
  #[instrument(skip(self, opts))]
  pub async fn collateral_pool_address_with(
    &self,
    market: &str,
    opts: &CallOptions,
  ) -> Result<Address, MarketError> {
    let market = Address::parse(market)?;

    let data = self
      .call::<MarketContract::MARKET_COLLATERAL_POOL_ADDRESSCall>(
        market,
        &MarketContract::MARKET_COLLATERAL_POOL_ADDRESSCall {},
        opts,
      )
      .await?;

    let pool = contracts::decode_address(&data)?;
    if pool.is_zero() {
      return Err(MarketError::AddressNotFound { market });
    }

    debug!(%market, %pool, "Collateral pool resolved");
    Ok(pool)
  }

  /// Oracle query descriptor of `market`.
  pub async fn oracle_query(&self, market: &str) -> Result<OracleQuery, MarketError> {
    self.oracle_query_with(market, &self.default_options()).await
  }

  /// [`Self::oracle_query`] with explicit call options.
  #[instrument(skip(self, opts))]
  pub async fn oracle_query_with(
    &self,
    market: &str,
    opts: &CallOptions,
  ) -> Result<OracleQuery, MarketError> {
    let market = Address::parse(market)?;

    let data = self
      .call::<MarketContract::ORACLE_QUERYCall>(market, &MarketContract::ORACLE_QUERYCall {}, opts)
      .await?;

    let query = OracleQuery::new(contracts::decode_string(&data)?)?;
    debug!(%market, query = %query, "Oracle query fetched");
    Ok(query)
  }

  /// Data source URL embedded in the oracle query of `market`.
  pub async fn oracle_query_url(&self, market: &str) -> Result<Url, MarketError> {
    self.oracle_query(market).await?.url()
  }

  /// Encode `call`, send it to `to` and enforce the deadline and cancellation.
  async fn call<C: SolCall>(
    &self,
    to: Address,
    call: &C,
    opts: &CallOptions,
  ) -> Result<Bytes, MarketError> {
    let request = CallRequest {
      to,
      method: C::SIGNATURE,
      calldata: call.abi_encode().into(),
      deadline: opts.deadline,
    };

    debug!(%to, method = C::SIGNATURE, "Issuing contract call");
    with_deadline(self.provider.call(request), opts).await
  }
}

/// Race `fut` against the caller's deadline and cancellation token.
async fn with_deadline<F>(fut: F, opts: &CallOptions) -> Result<Bytes, MarketError>
where
  F: Future<Output = Result<Bytes, ProviderError>>,
{
  let bounded = async {
    match opts.deadline {
      Some(deadline) => tokio::time::timeout(deadline, fut)
        .await
        .unwrap_or(Err(ProviderError::Timeout(deadline))),
      None => fut.await,
    }
  };

  let Some(token) = &opts.cancel else {
    return Ok(bounded.await?);
  };

  if token.is_cancelled() {
    return Err(MarketError::Cancelled);
  }

  tokio::select! {
    biased;
    () = token.cancelled() => Err(MarketError::Cancelled),
    res = bounded => Ok(res?),
  }
}
