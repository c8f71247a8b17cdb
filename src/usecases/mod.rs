//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain types with port interfaces.
//!
//! Use cases:
//! - `MarketClient`: whitelist, collateral pool and oracle query lookups

pub mod market;

pub use market::MarketClient;
