//! Chain Adapters - EVM JSON-RPC Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9:
//! - RPC provider management with startup validation
//! - `eth_call` throttling with a shared rate limiter

pub mod provider;

pub use provider::AlloyChainProvider;
