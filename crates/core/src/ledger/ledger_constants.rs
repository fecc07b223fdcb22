/// Transaction descriptions used by the core flows.
pub const DESC_DAILY_CHECKIN: &str = "Daily check-in reward";
pub const DESC_ASSET_REWARD: &str = "Daily asset-holding reward";
pub const DESC_PROPOSAL_BOND: &str = "Proposal creation bond";
pub const DESC_PROPOSAL_REFUND: &str = "Proposal creation bond refund";
pub const DESC_APPROVAL_INCENTIVE: &str = "Proposal approval incentive";
pub const DESC_CREATOR_REWARD: &str = "Governance creator reward";
