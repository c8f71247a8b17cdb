//! Validated contract address.
//!
//! The only way to obtain an [`Address`] from text is [`Address::parse`],
//! which enforces the `0x` + 40 hex digit format (42 characters total).
//! Hex digits are case-insensitive; EIP-55 checksums are not enforced.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address as EvmAddress;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::MarketError;

/// Total length of a textual address including the `0x` prefix.
pub const ADDRESS_LEN: usize = 42;

/// A 20-byte EVM account or contract address.
///
/// Stored as raw bytes, so two addresses that differ only in hex letter case
/// compare equal. Displays as lowercase `0x…`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(EvmAddress);

impl Address {
    /// The all-zero address, returned by contracts for unset references.
    pub const ZERO: Self = Self(EvmAddress::ZERO);

    /// Parse and validate a textual address.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidAddressFormat`] unless `s` is exactly
    /// `0x` followed by 40 hexadecimal digits.
    pub fn parse(s: &str) -> Result<Self, MarketError> {
        let invalid = || MarketError::InvalidAddressFormat(s.to_string());

        if s.len() != ADDRESS_LEN {
            return Err(invalid());
        }
        let digits = s.strip_prefix("0x").ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut raw = [0u8; 20];
        alloy::hex::decode_to_slice(digits, &mut raw).map_err(|_| invalid())?;
        Ok(Self(EvmAddress::from(raw)))
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The alloy representation, for building RPC requests.
    pub const fn into_inner(self) -> EvmAddress {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", alloy::hex::encode(self.0.as_slice()))
    }
}

impl FromStr for Address {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EvmAddress> for Address {
    fn from(addr: EvmAddress) -> Self {
        Self(addr)
    }
}

impl From<Address> for EvmAddress {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
