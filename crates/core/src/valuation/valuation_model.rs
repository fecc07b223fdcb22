//! Valuation domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amount::PointAmount;

/// Rarity tiers with their fixed multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn multiplier(&self) -> Decimal {
        match self {
            Rarity::Common => dec!(1.0),
            Rarity::Uncommon => dec!(1.2),
            Rarity::Rare => dec!(1.5),
            Rarity::Epic => dec!(2.0),
            Rarity::Legendary => dec!(3.0),
            Rarity::Mythic => dec!(5.0),
        }
    }
}

/// Source attributes captured from the external sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSourceAttributes {
    pub original_price: Decimal,
    pub total_supply: u64,
    pub issue_date: NaiveDate,
}

/// An externally-synced collectible owned by a user.
///
/// Replaced wholesale on each sync; `value` holds the last computed
/// valuation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: String,
    pub owner_user_id: String,
    pub whale_collection_id: String,
    pub rarity: Rarity,
    pub value: PointAmount,
    pub acquired_at: DateTime<Utc>,
    pub attributes: ItemSourceAttributes,
}

/// Live market metrics for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMarketStats {
    pub floor_price: Decimal,
    pub market_cap: Decimal,
    pub trading_volume_24h: Decimal,
    pub holder_count: u64,
}

/// One smoothing-history data point. Not user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationHistoryEntry {
    pub value: Decimal,
    pub date: NaiveDate,
}

/// Intermediate factors of one valuation run.
#[derive(Debug, Clone)]
pub struct ValuationBreakdown {
    pub base_value: Decimal,
    pub rarity_multiplier: Decimal,
    pub time_decay_factor: Decimal,
    pub market_multiplier: Decimal,
    /// Value after volatility smoothing, before premium and final clamp.
    /// This is what gets recorded in the history.
    pub smoothed_value: Decimal,
    pub final_value: PointAmount,
}
