//! Asset valuation engine - multi-factor pricing of synced collectibles.

mod valuation_constants;
mod valuation_errors;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_constants::*;
pub use valuation_errors::ValuationError;
pub use valuation_model::{
    CollectionItem, CollectionMarketStats, ItemSourceAttributes, Rarity, ValuationBreakdown,
    ValuationHistoryEntry,
};
pub use valuation_service::{compute_valuation, ValuationService};
pub use valuation_traits::{
    CollectionMarketDataTrait, ValuationHistoryRepositoryTrait, ValuationServiceTrait,
};
