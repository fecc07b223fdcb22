//! In-memory storage implementation for the Whalepod points economy.
//!
//! This crate implements the repository traits defined in `whalepod-core`
//! with process-local data structures. It is the only place where locking
//! and id assignment live; the core stays storage-agnostic and works with
//! traits.
//!
//! Atomicity contract:
//! - a ledger entry is applied while holding the target account's lock, so
//!   the balance read, invariant check, and write are indivisible;
//! - a transfer locks both accounts (in sorted id order) and commits either
//!   both legs or neither;
//! - the public pool serializes through the transaction log lock, since its
//!   balance is derived from the log rather than stored.

pub mod governance;
pub mod ledger;
pub mod valuation;

pub use governance::{MemoryProposalRepository, MemoryVoteRepository};
pub use ledger::MemoryLedgerRepository;
pub use valuation::MemoryValuationHistoryRepository;

// Re-export from whalepod-core for convenience
pub use whalepod_core::errors::{Error, Result};
