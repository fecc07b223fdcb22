use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::{Decimal, MathematicalOps};

use super::valuation_constants::*;
use super::valuation_model::{
    CollectionItem, CollectionMarketStats, ValuationBreakdown, ValuationHistoryEntry,
};
use super::valuation_traits::{
    CollectionMarketDataTrait, ValuationHistoryRepositoryTrait, ValuationServiceTrait,
};
use crate::amount::PointAmount;
use crate::errors::Result;
use crate::utils::Clock;

/// Deterministic multi-factor valuation of a collectible.
///
/// Pure given the market stats and the smoothing history as of `today`.
/// The returned `smoothed_value` is what the caller must record in the
/// history; `final_value` feeds the reward pipeline.
pub fn compute_valuation(
    item: &CollectionItem,
    stats: &CollectionMarketStats,
    history: &[ValuationHistoryEntry],
    today: NaiveDate,
) -> ValuationBreakdown {
    // Base value from the two price anchors, scaled by scarcity.
    let supply = Decimal::from(item.attributes.total_supply.max(1));
    let scarcity_factor = (SCARCITY_SUPPLY_REFERENCE / supply).max(SCARCITY_FLOOR);
    let base_value = (stats.floor_price * FLOOR_PRICE_WEIGHT
        + item.attributes.original_price * ORIGINAL_PRICE_WEIGHT)
        * scarcity_factor
        * BASE_VALUE_SCALE;

    let rarity_multiplier = item.rarity.multiplier();

    // Full value inside the grace period, exponential decay after.
    let age_days = (today - item.attributes.issue_date).num_days();
    let time_decay_factor = if age_days <= DECAY_GRACE_DAYS {
        Decimal::ONE
    } else {
        let months_since_issue = Decimal::from(age_days) / Decimal::from(30);
        DECAY_RATE
            .powd(months_since_issue * DECAY_TIME_WEIGHT)
            .max(DECAY_FLOOR)
    };

    let volume_multiplier =
        (Decimal::ONE + stats.trading_volume_24h / VOLUME_REFERENCE).min(VOLUME_MULTIPLIER_CAP);
    let holder_multiplier = (Decimal::ONE
        + Decimal::from(stats.holder_count) / HOLDER_REFERENCE * HOLDER_WEIGHT)
        .min(HOLDER_MULTIPLIER_CAP);
    let market_multiplier = (volume_multiplier + holder_multiplier) / Decimal::from(2);

    let raw_value = base_value * rarity_multiplier * time_decay_factor * market_multiplier;

    // Volatility smoothing: a move beyond +/-50% of the last recorded
    // value is scaled back to exactly that bound.
    let baseline = history.last().map(|entry| entry.value);
    let smoothed_value = match baseline {
        Some(last) if last > Decimal::ZERO => {
            let upper = last * (Decimal::ONE + MAX_VALUE_CHANGE_RATE);
            let lower = last * (Decimal::ONE - MAX_VALUE_CHANGE_RATE);
            raw_value.clamp(lower, upper)
        }
        _ => raw_value,
    };

    let mut final_value = smoothed_value;
    if is_first_party(&item.whale_collection_id) {
        final_value *= FIRST_PARTY_PREMIUM;
    }
    let final_value = PointAmount::new(final_value.clamp(MIN_REWARD, MAX_DAILY_REWARD));

    ValuationBreakdown {
        base_value,
        rarity_multiplier,
        time_decay_factor,
        market_multiplier,
        smoothed_value,
        final_value,
    }
}

/// Service wiring the pure valuation to the market-data collaborator and
/// the persisted smoothing history.
pub struct ValuationService {
    market_data: Arc<dyn CollectionMarketDataTrait>,
    history: Arc<dyn ValuationHistoryRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl ValuationService {
    pub fn new(
        market_data: Arc<dyn CollectionMarketDataTrait>,
        history: Arc<dyn ValuationHistoryRepositoryTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            market_data,
            history,
            clock,
        }
    }

    /// Fetches live metrics, degrading to the static estimate table when
    /// the collaborator stays unavailable after a retry. A missing quote
    /// must never block the reward pipeline.
    async fn fetch_stats(&self, collection_id: &str) -> CollectionMarketStats {
        match self.try_fetch_stats(collection_id).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(
                    "Market data unavailable for {collection_id}, falling back to estimates: {err}"
                );
                CollectionMarketStats {
                    floor_price: estimated_floor_price(collection_id),
                    ..Default::default()
                }
            }
        }
    }

    async fn try_fetch_stats(&self, collection_id: &str) -> Result<CollectionMarketStats> {
        let floor_price = with_retry(|| self.market_data.floor_price(collection_id)).await?;
        let market_cap = with_retry(|| self.market_data.market_cap(collection_id)).await?;
        let trading_volume_24h =
            with_retry(|| self.market_data.trading_volume_24h(collection_id)).await?;
        let holder_count = with_retry(|| self.market_data.holder_count(collection_id)).await?;
        Ok(CollectionMarketStats {
            floor_price,
            market_cap,
            trading_volume_24h,
            holder_count,
        })
    }

    async fn run(&self, item: &CollectionItem, record: bool) -> Result<PointAmount> {
        let stats = self.fetch_stats(&item.whale_collection_id).await;
        let history = self.history.history(&item.whale_collection_id)?;
        let today = self.clock.now().date_naive();
        let breakdown = compute_valuation(item, &stats, &history, today);
        if record {
            self.history
                .append(
                    &item.whale_collection_id,
                    ValuationHistoryEntry {
                        value: breakdown.smoothed_value,
                        date: today,
                    },
                    VALUATION_HISTORY_CAP,
                )
                .await?;
        }
        debug!(
            "Valued item {} ({}) at {}",
            item.id, item.whale_collection_id, breakdown.final_value
        );
        Ok(breakdown.final_value)
    }
}

async fn with_retry<T, F, Fut>(mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match call().await {
        Ok(value) => Ok(value),
        Err(err) => {
            debug!("Market data call failed, retrying once: {err}");
            call().await
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value(&self, item: &CollectionItem) -> Result<PointAmount> {
        self.run(item, true).await
    }

    async fn preview_value(&self, item: &CollectionItem) -> Result<PointAmount> {
        self.run(item, false).await
    }
}
