use thiserror::Error;

use crate::amount::PointAmount;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("User {user_id} already checked in today")]
    AlreadyCheckedIn { user_id: String },

    #[error("User {user_id} reached the daily earning cap of {cap}")]
    DailyCapReached { user_id: String, cap: PointAmount },
}
