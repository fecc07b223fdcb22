//! In-memory storage implementation for governance proposals and votes.

mod repository;

pub use repository::{MemoryProposalRepository, MemoryVoteRepository};
