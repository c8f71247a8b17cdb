//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces the usecases layer requires from the outside
//! world. Adapters implement these traits.
//!
//! - `ChainProvider`: read-only contract calls with deadline/cancellation
//! - `contracts`: ABI vocabulary for the registry and market contracts

pub mod chain_provider;
pub mod contracts;

pub use chain_provider::{CallOptions, CallRequest, ChainProvider};
