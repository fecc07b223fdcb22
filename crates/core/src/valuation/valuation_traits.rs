//! Valuation collaborator traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::valuation_model::{CollectionItem, ValuationHistoryEntry};
use crate::amount::PointAmount;
use crate::errors::Result;

/// Market-data collaborator keyed by external collection id.
///
/// Implementations may be unavailable; the valuation service retries once
/// and then degrades to the static estimate table.
#[async_trait]
pub trait CollectionMarketDataTrait: Send + Sync {
    async fn floor_price(&self, collection_id: &str) -> Result<Decimal>;
    async fn market_cap(&self, collection_id: &str) -> Result<Decimal>;
    async fn trading_volume_24h(&self, collection_id: &str) -> Result<Decimal>;
    async fn holder_count(&self, collection_id: &str) -> Result<u64>;
}

/// Durable, ordered, capped per-collection smoothing history.
#[async_trait]
pub trait ValuationHistoryRepositoryTrait: Send + Sync {
    /// Entries in chronological order, oldest first.
    fn history(&self, collection_id: &str) -> Result<Vec<ValuationHistoryEntry>>;

    /// Appends an entry, truncating to the newest `cap` entries.
    async fn append(
        &self,
        collection_id: &str,
        entry: ValuationHistoryEntry,
        cap: usize,
    ) -> Result<()>;
}

#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Values the item and records the smoothed value in the collection's
    /// history (stateful write).
    async fn value(&self, item: &CollectionItem) -> Result<PointAmount>;

    /// Values the item without touching the history (idempotent read).
    async fn preview_value(&self, item: &CollectionItem) -> Result<PointAmount>;
}
