//! Contract ABI bindings for the MARKET protocol lookups.
//!
//! Only the view functions the client reads are declared. Return data is
//! decoded by the caller so that malformed address words can be reported
//! instead of rejected by the ABI decoder.

use alloy::primitives::B256;
use alloy::sol;
use alloy::sol_types::SolValue;

use crate::domain::{Address, MarketError, ProviderError};

sol! {
    /// Registry of markets deployed through the MARKET protocol factory.
    interface MarketContractRegistry {
        function getAddressWhiteList() external view returns (address[] memory);
    }

    /// A single MARKET protocol market contract.
    interface MarketContract {
        function MARKET_COLLATERAL_POOL_ADDRESS() external view returns (address);

        /// Oraclize query used to settle the market.
        function ORACLE_QUERY() external view returns (string memory);
    }
}

/// Decode a single `address` return value.
pub fn decode_address(data: &[u8]) -> Result<Address, MarketError> {
    let word = B256::abi_decode(data, true).map_err(decode_error)?;
    address_from_word(&word)
}

/// Decode an `address[]` return value, checking every element's padding.
pub fn decode_address_array(data: &[u8]) -> Result<Vec<Address>, MarketError> {
    let words = Vec::<B256>::abi_decode(data, true).map_err(decode_error)?;
    words.iter().map(address_from_word).collect()
}

/// Decode a `string` return value.
pub fn decode_string(data: &[u8]) -> Result<String, MarketError> {
    String::abi_decode(data, true).map_err(decode_error)
}

/// An address occupies the low 20 bytes of a word; the upper 12 must be zero.
fn address_from_word(word: &B256) -> Result<Address, MarketError> {
    let (padding, raw) = word.split_at(12);
    if padding.iter().any(|b| *b != 0) {
        return Err(MarketError::InvalidAddressFormat(word.to_string()));
    }
    Ok(Address::from(alloy::primitives::Address::from_slice(raw)))
}

fn decode_error(err: alloy::sol_types::Error) -> MarketError {
    ProviderError::Decode(err.to_string()).into()
}
