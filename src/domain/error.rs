//! Error taxonomy for registry and market lookups.
//!
//! Every client operation returns [`MarketError`]. Callers are expected to
//! branch on the variant: a bad address is fixed by changing the input, a
//! provider failure by checking the network and trying again.

use std::time::Duration;

use thiserror::Error;

use super::address::Address;

/// Failure reported by a [`crate::ports::chain_provider::ChainProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The RPC endpoint could not be reached or returned a transport error.
    #[error("transport error: {0}")]
    Transport(String),
    /// The contract call reverted.
    #[error("call reverted: {0}")]
    Revert(String),
    /// The call succeeded but the return data did not match the ABI.
    #[error("failed to decode return data: {0}")]
    Decode(String),
    /// The call did not finish before its deadline.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    /// The endpoint serves a different chain than the one configured.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainIdMismatch {
        /// Chain id from configuration.
        expected: u64,
        /// Chain id reported by the endpoint.
        actual: u64,
    },
    /// No contract code is deployed at the address.
    #[error("no contract code deployed at {0}")]
    MissingContract(Address),
}

/// Error returned by [`crate::usecases::market::MarketClient`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// The network configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// An address (caller input or contract response) is not `0x` + 40 hex digits.
    #[error("invalid address format: {0:?}")]
    InvalidAddressFormat(String),
    /// The underlying contract call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The lookup succeeded but returned the zero address.
    #[error("market {market} has no collateral pool")]
    AddressNotFound {
        /// Market whose lookup came back empty.
        market: Address,
    },
    /// The oracle descriptor has no parenthesized segment or carries an invalid URL.
    #[error("malformed oracle query: {0:?}")]
    MalformedOracleQuery(String),
    /// The caller cancelled the call before it completed.
    #[error("call cancelled")]
    Cancelled,
}

impl MarketError {
    /// Whether repeating the same call might succeed.
    ///
    /// Only transport failures and timeouts qualify. Input, format and
    /// configuration errors stay wrong until the caller changes something.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Provider(ProviderError::Transport(_) | ProviderError::Timeout(_))
        )
    }
}
