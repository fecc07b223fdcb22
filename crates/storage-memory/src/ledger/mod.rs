//! In-memory storage implementation for the points ledger.

mod repository;

pub use repository::MemoryLedgerRepository;
