//! Governance repository and service traits.

use async_trait::async_trait;

use super::governance_model::{
    EligibilityProfile, NewProposal, NewVote, NewVoteRecord, Proposal, ProposalResult,
    ProposalStatus, Vote, VoteTally,
};
use crate::errors::Result;

#[async_trait]
pub trait ProposalRepositoryTrait: Send + Sync {
    async fn insert(&self, proposal: Proposal) -> Result<Proposal>;

    fn get_by_id(&self, proposal_id: &str) -> Result<Proposal>;

    fn list(&self, status_filter: Option<ProposalStatus>) -> Result<Vec<Proposal>>;

    /// Transitions the proposal's status, optionally recording the result.
    ///
    /// The transition is compare-and-swap on `expected`: it fails with
    /// `InvalidProposalTransition` when the stored status has moved on, so
    /// concurrent transitions resolve to exactly one winner.
    async fn set_status(
        &self,
        proposal_id: &str,
        expected: ProposalStatus,
        status: ProposalStatus,
        result: Option<ProposalResult>,
    ) -> Result<Proposal>;

    /// Replaces the cached aggregates with a freshly recomputed tally.
    async fn update_tally(&self, proposal_id: &str, tally: VoteTally) -> Result<Proposal>;
}

#[async_trait]
pub trait VoteRepositoryTrait: Send + Sync {
    /// Atomically claims the (proposal, user) ballot slot. Fails with
    /// `AlreadyVoted` when the slot is taken; concurrent claims resolve to
    /// exactly one winner.
    async fn claim_ballot(&self, proposal_id: &str, user_id: &str) -> Result<()>;

    /// Releases a claimed slot after a failed debit so the user can retry.
    async fn release_ballot(&self, proposal_id: &str, user_id: &str) -> Result<()>;

    async fn insert_vote(&self, record: NewVoteRecord) -> Result<Vote>;

    fn votes_for_proposal(&self, proposal_id: &str) -> Result<Vec<Vote>>;
}

/// Read-only identity collaborator consumed by proposal creation.
#[async_trait]
pub trait EligibilityProviderTrait: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<EligibilityProfile>;
}

#[async_trait]
pub trait GovernanceServiceTrait: Send + Sync {
    /// Creates a proposal in `Draft`, collecting the creation bond into the
    /// public pool.
    async fn create_proposal(&self, user_id: &str, data: NewProposal) -> Result<Proposal>;

    /// `Draft -> Active`; pays the creator the approval incentive from the
    /// pool (skipped when it rounds to zero).
    async fn approve_proposal(&self, proposal_id: &str, admin_id: &str) -> Result<Proposal>;

    /// `Draft -> Cancelled`; refunds the full creation bond.
    async fn reject_proposal(
        &self,
        proposal_id: &str,
        admin_id: &str,
        reason: &str,
    ) -> Result<Proposal>;

    /// Casts a quadratic-cost vote and recomputes the proposal tally.
    async fn cast_vote(&self, proposal_id: &str, user_id: &str, vote: NewVote) -> Result<Vote>;

    /// Ends voting, decides the result, and distributes the creator reward
    /// on approval (capped by the pool; payout failure never fails the
    /// finalization).
    async fn finalize_proposal(&self, proposal_id: &str) -> Result<Proposal>;

    /// Largest strength the user's balance can quadratically afford, capped
    /// by the system ceiling.
    fn max_vote_strength_for_user(&self, user_id: &str) -> Result<u32>;

    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal>;

    fn list_proposals(&self, status_filter: Option<ProposalStatus>) -> Result<Vec<Proposal>>;
}
