//! JSON-RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Implements the `ChainProvider` port over an alloy HTTP provider.
//! Validates the endpoint at startup (chain id + registry code) and
//! throttles outgoing `eth_call`s so public RPC quotas are respected.
//!
//! The alloy provider is stored type-erased as `dyn Provider` to keep
//! the deeply-nested builder types out of the adapter's API.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Bytes;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{debug, info, instrument, warn};

use crate::config::NetworkConfig;
use crate::domain::{Address, MarketError, ProviderError};
use crate::ports::chain_provider::{CallRequest, ChainProvider};

/// Upper bound on the connect handshake (chain id + registry code).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// `ChainProvider` backed by alloy-rs.
///
/// Share it across tasks by wrapping in `Arc`; all calls pass through
/// a single rate limiter.
pub struct AlloyChainProvider {
    /// The alloy provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Outgoing call throttle.
    limiter: DefaultDirectRateLimiter,
    /// Chain id confirmed at connect time.
    chain_id: u64,
}

impl AlloyChainProvider {
    /// Connect to the configured endpoint and validate it.
    ///
    /// Fails with [`MarketError::InvalidConfiguration`] before touching the
    /// network if the registry address is malformed. Fails with a provider
    /// error if the endpoint reports a different chain id than
    /// `config.chain_id`, or if the registry address has no code.
    #[instrument(skip_all, fields(chain_id = config.chain_id))]
    pub async fn connect(config: &NetworkConfig) -> Result<Self, MarketError> {
        let registry = Address::parse(&config.registry_address).map_err(|_| {
            MarketError::InvalidConfiguration(format!(
                "registry_address {:?} is not a valid address",
                config.registry_address
            ))
        })?;

        let provider = ProviderBuilder::new()
            .on_builtin(&config.provider_url)
            .await
            .map_err(map_transport_error)?;
        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let adapter = Self::from_provider(provider, config.max_calls_per_second);

        let actual = adapter
            .provider
            .get_chain_id()
            .await
            .map_err(map_transport_error)?;
        if actual != config.chain_id {
            return Err(ProviderError::ChainIdMismatch {
                expected: config.chain_id,
                actual,
            }
            .into());
        }

        adapter.ensure_contract(registry).await?;

        info!(chain_id = actual, %registry, "Connected to JSON-RPC endpoint");
        Ok(Self {
            chain_id: actual,
            ..adapter
        })
    }

    /// Wrap an existing alloy provider without validating it.
    pub fn from_provider(provider: Arc<dyn Provider + Send + Sync>, max_calls_per_second: u32) -> Self {
        let rate = NonZeroU32::new(max_calls_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            provider,
            limiter: RateLimiter::direct(Quota::per_second(rate)),
            chain_id: 0,
        }
    }

    /// Chain id confirmed by [`Self::connect`] (0 if not connected that way).
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Fail unless `address` holds deployed contract code.
    pub async fn ensure_contract(&self, address: Address) -> Result<(), ProviderError> {
        self.limiter.until_ready().await;
        let code = self
            .provider
            .get_code_at(address.into_inner())
            .await
            .map_err(map_transport_error)?;

        if code.is_empty() {
            warn!(%address, "No contract code at address");
            return Err(ProviderError::MissingContract(address));
        }
        debug!(%address, code_len = code.len(), "Contract code present");
        Ok(())
    }

    async fn eth_call(&self, request: &CallRequest) -> Result<Bytes, ProviderError> {
        self.limiter.until_ready().await;

        let tx = TransactionRequest::default()
            .to(request.to.into_inner())
            .input(request.calldata.clone().into());

        self.provider.call(&tx).await.map_err(map_transport_error)
    }
}

#[async_trait]
impl ChainProvider for AlloyChainProvider {
    #[instrument(skip(self, request), fields(to = %request.to, method = request.method))]
    async fn call(&self, request: CallRequest) -> Result<Bytes, ProviderError> {
        let result = match request.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.eth_call(&request))
                .await
                .unwrap_or(Err(ProviderError::Timeout(deadline))),
            None => self.eth_call(&request).await,
        };

        match &result {
            Ok(data) => debug!(bytes = data.len(), "eth_call returned"),
            Err(e) => warn!(error = %e, "eth_call failed"),
        }
        result
    }
}

/// Split node-side error responses (reverts) from transport failures.
fn map_transport_error(err: TransportError) -> ProviderError {
    match err {
        RpcError::ErrorResp(payload) => ProviderError::Revert(payload.message.to_string()),
        RpcError::DeserError { err, .. } => ProviderError::Decode(err.to_string()),
        other => ProviderError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::TransportErrorKind;
    use tokio::net::TcpListener;

    use super::*;

    const REGISTRY: &str = "0x2d5a2e0c0d3b4bcd4e4d7e9b7c63a0a61a8ff4b6";

    fn request(deadline: Option<Duration>) -> CallRequest {
        CallRequest {
            to: Address::parse(REGISTRY).unwrap(),
            method: "getAddressWhiteList()",
            calldata: Bytes::from_static(&[0x01, 0x02, 0x03, 0x04]),
            deadline,
        }
    }

    async fn adapter_for(url: &str) -> AlloyChainProvider {
        let provider = ProviderBuilder::new().on_builtin(url).await.unwrap();
        AlloyChainProvider::from_provider(Arc::new(provider), 100)
    }

    #[test]
    fn test_error_response_maps_to_revert() {
        let err = RpcError::ErrorResp(ErrorPayload {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        });
        assert_eq!(
            map_transport_error(err),
            ProviderError::Revert("execution reverted".to_string())
        );
    }

    #[test]
    fn test_bad_response_body_maps_to_decode() {
        let err = RpcError::DeserError {
            err: serde_json::from_str::<u64>("\"0xzz\"").unwrap_err(),
            text: "\"0xzz\"".to_string(),
        };
        assert!(matches!(map_transport_error(err), ProviderError::Decode(_)));
    }

    #[test]
    fn test_transport_failure_maps_to_retryable_transport() {
        let err = TransportErrorKind::custom_str("connection reset by peer");
        let mapped = map_transport_error(err);
        assert!(matches!(mapped, ProviderError::Transport(_)));
        assert!(MarketError::from(mapped).is_retryable());
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_registry_without_network() {
        let config = NetworkConfig {
            registry_address: "0x2d5a".to_string(),
            chain_id: 4,
            // Nothing listens here; a network attempt would surface as a provider error.
            provider_url: "http://127.0.0.1:9".to_string(),
            call_timeout_ms: 1_000,
            max_calls_per_second: 10,
        };

        let err = AlloyChainProvider::connect(&config).await.err().unwrap();
        assert!(matches!(err, MarketError::InvalidConfiguration(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_call_to_stalled_node_times_out() {
        // Accept connections and never answer.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let adapter = adapter_for(&url).await;
        let deadline = Duration::from_millis(50);
        let err = adapter.call(request(Some(deadline))).await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout(deadline));

        server.abort();
    }

    #[tokio::test]
    async fn test_call_to_closed_port_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let adapter = adapter_for(&url).await;
        let err = adapter
            .call(request(Some(Duration::from_secs(5))))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
