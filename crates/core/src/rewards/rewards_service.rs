use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::rewards_errors::RewardError;
use super::rewards_traits::RewardServiceTrait;
use crate::amount::PointAmount;
use crate::errors::Result;
use crate::ledger::{
    LedgerServiceTrait, PointTransaction, RelatedEntity, TransactionType, DESC_ASSET_REWARD,
    DESC_DAILY_CHECKIN,
};
use crate::settings::EconomySettings;
use crate::utils::Clock;
use crate::valuation::{CollectionItem, ValuationServiceTrait};

/// Distributes earning-side rewards through the ledger.
///
/// Both reward flows respect the per-user daily earning cap: a reward is
/// clipped to the remaining headroom rather than rejected outright, so the
/// user always receives what the cap still allows.
pub struct RewardService {
    ledger: Arc<dyn LedgerServiceTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
    clock: Arc<dyn Clock>,
    settings: EconomySettings,
}

impl RewardService {
    pub fn new(
        ledger: Arc<dyn LedgerServiceTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
        clock: Arc<dyn Clock>,
        settings: EconomySettings,
    ) -> Self {
        Self {
            ledger,
            valuation,
            clock,
            settings,
        }
    }

    fn earned_on(&self, user_id: &str, date: NaiveDate) -> Result<PointAmount> {
        let transactions = self.ledger.transactions_for_user(user_id)?;
        Ok(transactions
            .iter()
            .filter(|tx| {
                tx.transaction_type.counts_toward_daily_cap()
                    && tx.amount.is_positive()
                    && tx.created_at.date_naive() == date
            })
            .map(|tx| tx.amount)
            .sum())
    }

    fn remaining_headroom(&self, user_id: &str, date: NaiveDate) -> Result<PointAmount> {
        let earned = self.earned_on(user_id, date)?;
        let cap = self.settings.max_daily_earning_cap;
        if earned >= cap {
            Ok(PointAmount::ZERO)
        } else {
            Ok(cap - earned)
        }
    }
}

#[async_trait]
impl RewardServiceTrait for RewardService {
    async fn daily_checkin(&self, user_id: &str) -> Result<PointTransaction> {
        let today = self.clock.now().date_naive();
        let transactions = self.ledger.transactions_for_user(user_id)?;
        let already_checked_in = transactions.iter().any(|tx| {
            tx.transaction_type == TransactionType::DailyCheckin
                && tx.created_at.date_naive() == today
        });
        if already_checked_in {
            return Err(RewardError::AlreadyCheckedIn {
                user_id: user_id.to_string(),
            }
            .into());
        }

        let headroom = self.remaining_headroom(user_id, today)?;
        if !headroom.is_positive() {
            return Err(RewardError::DailyCapReached {
                user_id: user_id.to_string(),
                cap: self.settings.max_daily_earning_cap,
            }
            .into());
        }

        let amount = self.settings.daily_checkin_points.min(headroom);
        self.ledger
            .credit(
                user_id,
                amount,
                TransactionType::DailyCheckin,
                DESC_DAILY_CHECKIN,
                None,
            )
            .await
    }

    async fn distribute_item_reward(
        &self,
        item: &CollectionItem,
    ) -> Result<Option<PointTransaction>> {
        let today = self.clock.now().date_naive();
        let headroom = self.remaining_headroom(&item.owner_user_id, today)?;
        if !headroom.is_positive() {
            debug!(
                "Skipping asset reward for item {}: owner {} is at the daily cap",
                item.id, item.owner_user_id
            );
            return Ok(None);
        }

        let value = self.valuation.value(item).await?;
        let amount = value.min(headroom);
        let transaction = self
            .ledger
            .credit(
                &item.owner_user_id,
                amount,
                TransactionType::AssetReward,
                DESC_ASSET_REWARD,
                Some(RelatedEntity::AssetItem(item.id.clone())),
            )
            .await?;
        Ok(Some(transaction))
    }

    fn earned_today(&self, user_id: &str) -> Result<PointAmount> {
        self.earned_on(user_id, self.clock.now().date_naive())
    }
}
