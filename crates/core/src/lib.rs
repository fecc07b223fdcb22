//! Whalepod Core - the points economy domain.
//!
//! This crate contains the economic core of the Whalepod platform: the
//! points ledger, the governance voting engine, and the asset valuation
//! engine. It is storage-agnostic and defines traits that are implemented
//! by the `storage-memory` crate (or any other persistence backend).

pub mod amount;
pub mod constants;
pub mod errors;
pub mod governance;
pub mod ledger;
pub mod rewards;
pub mod settings;
pub mod utils;
pub mod valuation;

// Re-export the most commonly used types
pub use amount::PointAmount;
pub use settings::EconomySettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
