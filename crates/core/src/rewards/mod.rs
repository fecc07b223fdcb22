//! Reward distribution - daily check-ins and asset-holding rewards.

mod rewards_errors;
mod rewards_service;
mod rewards_traits;

pub use rewards_errors::RewardError;
pub use rewards_service::RewardService;
pub use rewards_traits::RewardServiceTrait;
