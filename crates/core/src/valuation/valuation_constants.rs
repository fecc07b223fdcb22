//! Valuation tuning constants.
//!
//! Business-tuned values carried over as-is; they have no closed-form
//! derivation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Weights of the two price anchors in the base value.
pub const FLOOR_PRICE_WEIGHT: Decimal = dec!(0.4);
pub const ORIGINAL_PRICE_WEIGHT: Decimal = dec!(0.3);

/// Global scale applied to the weighted price.
pub const BASE_VALUE_SCALE: Decimal = dec!(0.01);

/// Scarcity factor: `max(0.1, 1000 / max(1, supply))`.
pub const SCARCITY_SUPPLY_REFERENCE: Decimal = dec!(1000);
pub const SCARCITY_FLOOR: Decimal = dec!(0.1);

/// Time decay: full value for the first 30 days, then
/// `max(0.5, 0.8 ^ (months * 0.1))`.
pub const DECAY_GRACE_DAYS: i64 = 30;
pub const DECAY_RATE: Decimal = dec!(0.8);
pub const DECAY_TIME_WEIGHT: Decimal = dec!(0.1);
pub const DECAY_FLOOR: Decimal = dec!(0.5);

/// Market multiplier inputs.
pub const VOLUME_REFERENCE: Decimal = dec!(10000);
pub const VOLUME_MULTIPLIER_CAP: Decimal = dec!(2.0);
pub const HOLDER_REFERENCE: Decimal = dec!(1000);
pub const HOLDER_WEIGHT: Decimal = dec!(0.1);
pub const HOLDER_MULTIPLIER_CAP: Decimal = dec!(1.5);

/// Volatility smoothing: a new value may move at most this share away from
/// the last recorded value.
pub const MAX_VALUE_CHANGE_RATE: Decimal = dec!(0.5);
/// Rolling cap on stored history entries per collection.
pub const VALUATION_HISTORY_CAP: usize = 30;

/// Premium applied to recognized first-party collections.
pub const FIRST_PARTY_PREMIUM: Decimal = dec!(1.2);

/// Reward clamp.
pub const MIN_REWARD: Decimal = dec!(0.0001);
pub const MAX_DAILY_REWARD: Decimal = dec!(100);

/// Known first-party collection ids.
pub const FIRST_PARTY_COLLECTIONS: &[&str] = &[
    "whale-genesis",
    "whale-og-pass",
    "whale-deep-dive",
];

/// True when the collection belongs to the recognized first-party set.
pub fn is_first_party(collection_id: &str) -> bool {
    FIRST_PARTY_COLLECTIONS.contains(&collection_id)
}

/// Static floor-price estimates used when the market-data collaborator is
/// unavailable. Unknown collections default to zero.
pub fn estimated_floor_price(collection_id: &str) -> Decimal {
    match collection_id {
        "whale-genesis" => dec!(120),
        "whale-og-pass" => dec!(80),
        "whale-deep-dive" => dec!(45),
        _ => Decimal::ZERO,
    }
}
