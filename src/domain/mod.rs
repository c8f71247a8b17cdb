//! Domain layer - Value types and error taxonomy.
//!
//! Pure types with no I/O: validated addresses, oracle query descriptors
//! and the errors every lookup can produce. Everything here is testable
//! in isolation (hexagonal architecture inner ring).

pub mod address;
pub mod error;
pub mod oracle_query;

// Re-export core types for convenience
pub use address::Address;
pub use error::{MarketError, ProviderError};
pub use oracle_query::OracleQuery;
