use async_trait::async_trait;
use dashmap::DashMap;

use whalepod_core::errors::Result;
use whalepod_core::valuation::{ValuationHistoryEntry, ValuationHistoryRepositoryTrait};

/// In-memory per-collection valuation history.
///
/// Entries are kept in append order, oldest first, truncated to the cap
/// passed by the caller on every append.
#[derive(Default)]
pub struct MemoryValuationHistoryRepository {
    histories: DashMap<String, Vec<ValuationHistoryEntry>>,
}

impl MemoryValuationHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ValuationHistoryRepositoryTrait for MemoryValuationHistoryRepository {
    fn history(&self, collection_id: &str) -> Result<Vec<ValuationHistoryEntry>> {
        Ok(self
            .histories
            .get(collection_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn append(
        &self,
        collection_id: &str,
        entry: ValuationHistoryEntry,
        cap: usize,
    ) -> Result<()> {
        let mut entries = self
            .histories
            .entry(collection_id.to_string())
            .or_default();
        entries.push(entry);
        if entries.len() > cap {
            let excess = entries.len() - cap;
            entries.drain(0..excess);
        }
        Ok(())
    }
}
