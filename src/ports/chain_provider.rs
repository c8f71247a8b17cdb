//! Chain Provider Port - Read-only Contract Call Interface
//!
//! Defines the single capability the client needs from the outside
//! world: execute an `eth_call` against a contract and hand back the
//! raw return data. Transport, node selection and retries belong to the
//! implementation behind this trait.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Bytes;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{Address, ProviderError};

/// A single read-only contract call.
#[derive(Debug, Clone)]
pub struct CallRequest {
  /// Contract to call.
  pub to: Address,
  /// Solidity signature of the method, for diagnostics only.
  pub method: &'static str,
  /// ABI-encoded calldata (selector + arguments).
  pub calldata: Bytes,
  /// Time budget the caller allows for this call.
  pub deadline: Option<Duration>,
}

/// Per-call deadline and cancellation.
///
/// Both are optional. A deadline that elapses yields
/// [`ProviderError::Timeout`]; a cancelled token yields
/// [`crate::domain::MarketError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
  /// Maximum time to wait for the provider.
  pub deadline: Option<Duration>,
  /// Token the caller may cancel to abandon the call.
  pub cancel: Option<CancellationToken>,
}

impl CallOptions {
  /// Options with only a deadline.
  pub const fn with_deadline(deadline: Duration) -> Self {
    Self {
      deadline: Some(deadline),
      cancel: None,
    }
  }

  /// Attach a cancellation token.
  #[must_use]
  pub fn cancellable(mut self, token: CancellationToken) -> Self {
    self.cancel = Some(token);
    self
  }
}

/// Trait for read-only contract calls.
///
/// Implementations must be safe to share across tasks; the client
/// issues calls concurrently through a shared reference.
#[async_trait]
pub trait ChainProvider: Send + Sync + 'static {
  /// Execute `request` and return the raw ABI-encoded return data.
  async fn call(&self, request: CallRequest) -> Result<Bytes, ProviderError>;
}

#[async_trait]
impl<T: ChainProvider + ?Sized> ChainProvider for Arc<T> {
  async fn call(&self, request: CallRequest) -> Result<Bytes, ProviderError> {
    (**self).call(request).await
  }
}
