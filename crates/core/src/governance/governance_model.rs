//! Governance domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::governance_constants::MAX_TITLE_LENGTH;
use crate::amount::PointAmount;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Draft,
    Active,
    Ended,
    /// Applied externally after an approved proposal is carried out; the
    /// engine itself never sets it.
    Executed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalResult {
    Approved,
    Rejected,
    Tied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalCategory {
    Feature,
    Community,
    Treasury,
    Rule,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VotePosition {
    For,
    Against,
    Abstain,
}

/// Cached vote aggregates on a proposal.
///
/// A materialized view over the proposal's votes: the only way to obtain a
/// tally is [`VoteTally::from_votes`], so the cached fields can never drift
/// from the vote rows by hand-editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    /// Vote-strength sums per position.
    pub count_for: u64,
    pub count_against: u64,
    pub count_abstain: u64,
    /// Points-spent sums per position.
    pub points_for: PointAmount,
    pub points_against: PointAmount,
    pub points_abstain: PointAmount,
}

impl VoteTally {
    /// Recomputes the aggregates by summing over all votes per position.
    pub fn from_votes(votes: &[Vote]) -> Self {
        let mut tally = VoteTally::default();
        for vote in votes {
            let strength = u64::from(vote.vote_strength);
            match vote.position {
                VotePosition::For => {
                    tally.count_for += strength;
                    tally.points_for += vote.points_cost;
                }
                VotePosition::Against => {
                    tally.count_against += strength;
                    tally.points_against += vote.points_cost;
                }
                VotePosition::Abstain => {
                    tally.count_abstain += strength;
                    tally.points_abstain += vote.points_cost;
                }
            }
        }
        tally
    }

    pub fn total_points_spent(&self) -> PointAmount {
        self.points_for + self.points_against + self.points_abstain
    }

    /// Decides the outcome. `for == against` (0/0 included) is a tie;
    /// otherwise the for-share among decisive votes is compared to the
    /// approval threshold.
    pub fn decide(&self, approval_threshold: Decimal) -> ProposalResult {
        if self.count_for == self.count_against {
            return ProposalResult::Tied;
        }
        let decisive = Decimal::from(self.count_for + self.count_against);
        let ratio = Decimal::from(self.count_for) / decisive;
        if ratio >= approval_threshold {
            ProposalResult::Approved
        } else {
            ProposalResult::Rejected
        }
    }
}

/// A governance proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub category: ProposalCategory,
    pub status: ProposalStatus,
    pub voting_start_at: DateTime<Utc>,
    pub voting_end_at: DateTime<Utc>,
    pub min_points_to_vote: PointAmount,
    pub tally: VoteTally,
    pub result: Option<ProposalResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// True while votes are accepted: active status, inside `[start, end)`.
    pub fn voting_open(&self, now: DateTime<Utc>) -> bool {
        self.status == ProposalStatus::Active
            && now >= self.voting_start_at
            && now < self.voting_end_at
    }
}

/// Input model for creating a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub title: String,
    pub description: String,
    pub category: ProposalCategory,
    pub voting_start_at: DateTime<Utc>,
    pub voting_end_at: DateTime<Utc>,
    pub min_points_to_vote: PointAmount,
}

impl NewProposal {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Proposal title cannot be empty".to_string(),
            )));
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Proposal title exceeds {MAX_TITLE_LENGTH} characters"
            ))));
        }
        if self.voting_end_at <= self.voting_start_at {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Voting window must end after it starts".to_string(),
            )));
        }
        if self.min_points_to_vote.is_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Minimum points to vote cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}

/// A cast vote. Unique per (proposal, user), immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub proposal_id: String,
    pub user_id: String,
    pub position: VotePosition,
    pub vote_strength: u32,
    /// Quadratic cost: `vote_strength * vote_strength`.
    pub points_cost: PointAmount,
    pub justification: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for casting a vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVote {
    pub position: VotePosition,
    pub vote_strength: u32,
    pub justification: Option<String>,
}

/// Fully prepared vote row, missing only the storage-assigned id.
#[derive(Debug, Clone)]
pub struct NewVoteRecord {
    pub proposal_id: String,
    pub user_id: String,
    pub position: VotePosition,
    pub vote_strength: u32,
    pub points_cost: PointAmount,
    pub justification: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-only view supplied by the identity/eligibility collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityProfile {
    pub is_verified: bool,
    pub whale_nft_count: u32,
    /// Whether the user's displayed avatar is sourced from a verified
    /// collectible.
    pub avatar_from_verified_item: bool,
}
