//! In-memory storage implementation for valuation smoothing history.

mod repository;

pub use repository::MemoryValuationHistoryRepository;
