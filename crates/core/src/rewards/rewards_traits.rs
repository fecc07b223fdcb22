use async_trait::async_trait;

use crate::amount::PointAmount;
use crate::errors::Result;
use crate::ledger::PointTransaction;
use crate::valuation::CollectionItem;

#[async_trait]
pub trait RewardServiceTrait: Send + Sync {
    /// Credits the fixed check-in reward, at most once per UTC day. The
    /// credited amount is clipped to what remains under the daily cap.
    async fn daily_checkin(&self, user_id: &str) -> Result<PointTransaction>;

    /// Values the item and credits its owner. Returns `None` when the
    /// owner's daily earning cap leaves no room; otherwise the credit is
    /// clipped to the remaining headroom.
    async fn distribute_item_reward(&self, item: &CollectionItem)
        -> Result<Option<PointTransaction>>;

    /// Reward points the user has earned so far in the current UTC day.
    fn earned_today(&self, user_id: &str) -> Result<PointAmount>;
}
