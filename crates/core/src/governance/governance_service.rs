use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use uuid::Uuid;

use super::governance_errors::GovernanceError;
use super::governance_model::{
    NewProposal, NewVote, NewVoteRecord, Proposal, ProposalResult, ProposalStatus, Vote, VoteTally,
};
use super::governance_traits::{
    EligibilityProviderTrait, GovernanceServiceTrait, ProposalRepositoryTrait, VoteRepositoryTrait,
};
use crate::amount::PointAmount;
use crate::errors::Result;
use crate::ledger::{
    LedgerError, LedgerServiceTrait, RelatedEntity, TransactionType, DESC_APPROVAL_INCENTIVE,
    DESC_CREATOR_REWARD, DESC_PROPOSAL_BOND, DESC_PROPOSAL_REFUND,
};
use crate::settings::EconomySettings;
use crate::utils::Clock;

/// Service owning the proposal lifecycle and quadratic voting.
pub struct GovernanceService {
    proposals: Arc<dyn ProposalRepositoryTrait>,
    votes: Arc<dyn VoteRepositoryTrait>,
    ledger: Arc<dyn LedgerServiceTrait>,
    eligibility: Arc<dyn EligibilityProviderTrait>,
    clock: Arc<dyn Clock>,
    settings: EconomySettings,
}

impl GovernanceService {
    pub fn new(
        proposals: Arc<dyn ProposalRepositoryTrait>,
        votes: Arc<dyn VoteRepositoryTrait>,
        ledger: Arc<dyn LedgerServiceTrait>,
        eligibility: Arc<dyn EligibilityProviderTrait>,
        clock: Arc<dyn Clock>,
        settings: EconomySettings,
    ) -> Self {
        Self {
            proposals,
            votes,
            ledger,
            eligibility,
            clock,
            settings,
        }
    }

    fn require_status(
        proposal: &Proposal,
        expected: ProposalStatus,
        action: &str,
    ) -> Result<()> {
        if proposal.status != expected {
            return Err(GovernanceError::InvalidProposalTransition {
                status: proposal.status,
                action: action.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Recomputes the cached aggregates from the vote rows.
    async fn recompute_tally(&self, proposal_id: &str) -> Result<Proposal> {
        let votes = self.votes.votes_for_proposal(proposal_id)?;
        let tally = VoteTally::from_votes(&votes);
        self.proposals.update_tally(proposal_id, tally).await
    }

    /// Quadratic cost model: a vote of strength `s` costs `s * s` points.
    fn vote_cost(strength: u32) -> PointAmount {
        PointAmount::from(u64::from(strength) * u64::from(strength))
    }
}

#[async_trait]
impl GovernanceServiceTrait for GovernanceService {
    async fn create_proposal(&self, user_id: &str, data: NewProposal) -> Result<Proposal> {
        data.validate()?;

        let profile = self.eligibility.profile(user_id).await?;
        if !profile.avatar_from_verified_item {
            return Err(GovernanceError::InsufficientEligibility(
                "displayed avatar must be sourced from a verified collectible".to_string(),
            )
            .into());
        }
        if profile.whale_nft_count == 0 {
            return Err(GovernanceError::InsufficientEligibility(
                "at least one verified synced collectible is required".to_string(),
            )
            .into());
        }

        let account = self.ledger.get_account(user_id)?;
        if account.points_balance < self.settings.creation_bond {
            return Err(LedgerError::InsufficientBalance {
                account: user_id.to_string(),
                available: account.points_balance,
                requested: self.settings.creation_bond,
            }
            .into());
        }

        // Bond first, then the proposal row; the bond funds the pool.
        self.ledger
            .collect_to_pool(
                user_id,
                self.settings.creation_bond,
                TransactionType::ProposalCreation,
                DESC_PROPOSAL_BOND,
                None,
            )
            .await?;

        let now = self.clock.now();
        let proposal = Proposal {
            id: Uuid::new_v4().to_string(),
            creator_id: user_id.to_string(),
            title: data.title,
            description: data.description,
            category: data.category,
            status: ProposalStatus::Draft,
            voting_start_at: data.voting_start_at,
            voting_end_at: data.voting_end_at,
            min_points_to_vote: data.min_points_to_vote,
            tally: VoteTally::default(),
            result: None,
            created_at: now,
            updated_at: now,
        };
        let proposal = self.proposals.insert(proposal).await?;
        info!(
            "Proposal {} created by {user_id} (bond {})",
            proposal.id, self.settings.creation_bond
        );
        Ok(proposal)
    }

    async fn approve_proposal(&self, proposal_id: &str, admin_id: &str) -> Result<Proposal> {
        let proposal = self.proposals.get_by_id(proposal_id)?;
        Self::require_status(&proposal, ProposalStatus::Draft, "approve")?;

        // Compare-and-swap on Draft: a racing approval loses here before
        // any incentive is paid.
        let proposal = self
            .proposals
            .set_status(proposal_id, ProposalStatus::Draft, ProposalStatus::Active, None)
            .await?;
        info!("Proposal {proposal_id} approved by {admin_id}");

        let pool = self.ledger.public_pool_balance()?;
        let incentive = pool.mul_rate(self.settings.approval_incentive_rate);
        if incentive.is_positive() {
            self.ledger
                .payout_from_pool(
                    &proposal.creator_id,
                    incentive,
                    TransactionType::GovernanceReward,
                    DESC_APPROVAL_INCENTIVE,
                    Some(RelatedEntity::Proposal(proposal_id.to_string())),
                )
                .await?;
        } else {
            debug!("Approval incentive for {proposal_id} rounds to zero, skipping");
        }
        Ok(proposal)
    }

    async fn reject_proposal(
        &self,
        proposal_id: &str,
        admin_id: &str,
        reason: &str,
    ) -> Result<Proposal> {
        let proposal = self.proposals.get_by_id(proposal_id)?;
        Self::require_status(&proposal, ProposalStatus::Draft, "reject")?;

        let proposal = self
            .proposals
            .set_status(
                proposal_id,
                ProposalStatus::Draft,
                ProposalStatus::Cancelled,
                None,
            )
            .await?;
        info!("Proposal {proposal_id} rejected by {admin_id}: {reason}");

        // Full bond refund from the pool.
        self.ledger
            .payout_from_pool(
                &proposal.creator_id,
                self.settings.creation_bond,
                TransactionType::ProposalRefund,
                DESC_PROPOSAL_REFUND,
                Some(RelatedEntity::Proposal(proposal_id.to_string())),
            )
            .await?;
        Ok(proposal)
    }

    async fn cast_vote(&self, proposal_id: &str, user_id: &str, vote: NewVote) -> Result<Vote> {
        let proposal = self.proposals.get_by_id(proposal_id)?;
        let now = self.clock.now();
        if !proposal.voting_open(now) {
            return Err(GovernanceError::VotingClosed(format!(
                "proposal {proposal_id} is not accepting votes"
            ))
            .into());
        }
        if vote.vote_strength < super::MIN_VOTE_STRENGTH
            || vote.vote_strength > self.settings.max_vote_strength
        {
            return Err(GovernanceError::VoteStrengthOutOfRange {
                strength: vote.vote_strength,
                max: self.settings.max_vote_strength,
            }
            .into());
        }

        let account = self.ledger.get_account(user_id)?;
        if account.points_balance < proposal.min_points_to_vote {
            return Err(LedgerError::InsufficientBalance {
                account: user_id.to_string(),
                available: account.points_balance,
                requested: proposal.min_points_to_vote,
            }
            .into());
        }
        let cost = Self::vote_cost(vote.vote_strength);

        // Claim the ballot slot before the debit so a racing duplicate can
        // neither double-record nor double-debit.
        self.votes.claim_ballot(proposal_id, user_id).await?;

        // Vote points fund the public pool; creator rewards are paid back
        // out of it on approval.
        let debit = self
            .ledger
            .collect_to_pool(
                user_id,
                cost,
                TransactionType::ProposalVote,
                &format!("Vote on proposal {}", proposal.title),
                Some(RelatedEntity::Proposal(proposal_id.to_string())),
            )
            .await;
        if let Err(err) = debit {
            self.votes.release_ballot(proposal_id, user_id).await?;
            return Err(err);
        }

        let record = NewVoteRecord {
            proposal_id: proposal_id.to_string(),
            user_id: user_id.to_string(),
            position: vote.position,
            vote_strength: vote.vote_strength,
            points_cost: cost,
            justification: vote.justification,
            created_at: now,
        };
        let vote = self.votes.insert_vote(record).await?;
        self.recompute_tally(proposal_id).await?;
        debug!(
            "Vote recorded: {} on {proposal_id} by {user_id}, strength {} cost {cost}",
            vote.id, vote.vote_strength
        );
        Ok(vote)
    }

    async fn finalize_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        let proposal = self.proposals.get_by_id(proposal_id)?;
        Self::require_status(&proposal, ProposalStatus::Active, "finalize")?;
        let now = self.clock.now();
        if now < proposal.voting_end_at {
            return Err(GovernanceError::InvalidProposalTransition {
                status: proposal.status,
                action: format!("finalize before the voting window closes at {}", proposal.voting_end_at),
            }
            .into());
        }

        let proposal = self.recompute_tally(proposal_id).await?;
        let result = proposal.tally.decide(self.settings.approval_threshold);

        // End the proposal before paying anything: the compare-and-swap on
        // Active admits exactly one finalizer, so the creator reward cannot
        // be paid twice by racing calls.
        let proposal = self
            .proposals
            .set_status(
                proposal_id,
                ProposalStatus::Active,
                ProposalStatus::Ended,
                Some(result),
            )
            .await?;

        if result == ProposalResult::Approved {
            let reward = proposal
                .tally
                .total_points_spent()
                .mul_rate(self.settings.creator_reward_rate);
            let pool = self.ledger.public_pool_balance()?;
            let payout = reward.min(pool);
            if payout.is_positive() {
                // A failed payout must not fail the finalization.
                if let Err(err) = self
                    .ledger
                    .payout_from_pool(
                        &proposal.creator_id,
                        payout,
                        TransactionType::GovernanceReward,
                        DESC_CREATOR_REWARD,
                        Some(RelatedEntity::Proposal(proposal_id.to_string())),
                    )
                    .await
                {
                    warn!("Creator reward payout for {proposal_id} failed: {err}");
                }
            } else {
                debug!("Creator reward for {proposal_id} is zero, skipping payout");
            }
        }

        info!("Proposal {proposal_id} finalized: {result:?}");
        Ok(proposal)
    }

    fn max_vote_strength_for_user(&self, user_id: &str) -> Result<u32> {
        let account = self.ledger.get_account(user_id)?;
        Ok(account
            .points_balance
            .floor_sqrt()
            .min(self.settings.max_vote_strength))
    }

    fn get_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        self.proposals.get_by_id(proposal_id)
    }

    fn list_proposals(&self, status_filter: Option<ProposalStatus>) -> Result<Vec<Proposal>> {
        self.proposals.list(status_filter)
    }
}
