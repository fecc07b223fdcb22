//! Economy configuration model.
//!
//! Tunable constants for the points economy. An `EconomySettings` value is
//! built once at startup and threaded into the service constructors - there
//! is no ambient global configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amount::PointAmount;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EconomySettings {
    /// Points staked to submit a governance proposal. Refunded on rejection.
    pub creation_bond: PointAmount,
    /// Share of for-votes (among for + against) required to approve.
    pub approval_threshold: Decimal,
    /// System-wide ceiling on a single vote's strength.
    pub max_vote_strength: u32,
    /// Smallest amount a ledger operation may move.
    pub min_transaction_unit: PointAmount,
    /// Ceiling on points a user can earn from rewards per UTC day.
    pub max_daily_earning_cap: PointAmount,
    /// Points credited by a daily check-in.
    pub daily_checkin_points: PointAmount,
    /// Share of the public pool paid to a creator when a proposal is
    /// approved for voting (0.01% by default).
    pub approval_incentive_rate: Decimal,
    /// Share of total points spent on votes paid to the creator when a
    /// proposal passes.
    pub creator_reward_rate: Decimal,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            creation_bond: PointAmount::from(1000u32),
            approval_threshold: dec!(0.667),
            max_vote_strength: 100,
            min_transaction_unit: PointAmount::MIN_UNIT,
            max_daily_earning_cap: PointAmount::from(1000u32),
            daily_checkin_points: PointAmount::from(10u32),
            approval_incentive_rate: dec!(0.0001),
            creator_reward_rate: dec!(0.1),
        }
    }
}

impl EconomySettings {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.creation_bond.is_positive() {
            return Err(invalid("creationBond must be positive"));
        }
        if self.approval_threshold <= Decimal::ZERO || self.approval_threshold > Decimal::ONE {
            return Err(invalid("approvalThreshold must be in (0, 1]"));
        }
        if self.max_vote_strength == 0 {
            return Err(invalid("maxVoteStrength must be at least 1"));
        }
        if !self.min_transaction_unit.is_positive() {
            return Err(invalid("minTransactionUnit must be positive"));
        }
        if !self.max_daily_earning_cap.is_positive() {
            return Err(invalid("maxDailyEarningCap must be positive"));
        }
        if self.daily_checkin_points.is_negative() {
            return Err(invalid("dailyCheckinPoints must not be negative"));
        }
        if self.approval_incentive_rate < Decimal::ZERO
            || self.approval_incentive_rate >= Decimal::ONE
        {
            return Err(invalid("approvalIncentiveRate must be in [0, 1)"));
        }
        if self.creator_reward_rate < Decimal::ZERO || self.creator_reward_rate > Decimal::ONE {
            return Err(invalid("creatorRewardRate must be in [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = EconomySettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.creation_bond, PointAmount::from(1000u32));
        assert_eq!(settings.max_vote_strength, 100);
    }

    #[test]
    fn rejects_zero_bond() {
        let settings = EconomySettings {
            creation_bond: PointAmount::ZERO,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_threshold_above_one() {
        let settings = EconomySettings {
            approval_threshold: dec!(1.5),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
