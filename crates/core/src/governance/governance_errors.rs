//! Governance error types.

use thiserror::Error;

use super::governance_model::ProposalStatus;

#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    /// Proposal-creation gating not met (avatar or collectible checks).
    #[error("Insufficient eligibility: {0}")]
    InsufficientEligibility(String),

    #[error("User {user_id} has already voted on proposal {proposal_id}")]
    AlreadyVoted {
        proposal_id: String,
        user_id: String,
    },

    /// Outside the voting window or the proposal is not accepting votes.
    #[error("Voting is closed: {0}")]
    VotingClosed(String),

    #[error("Vote strength {strength} is outside the allowed range 1..={max}")]
    VoteStrengthOutOfRange { strength: u32, max: u32 },

    /// approve/reject/finalize called from the wrong status.
    #[error("Cannot {action} proposal in status {status:?}")]
    InvalidProposalTransition {
        status: ProposalStatus,
        action: String,
    },
}
