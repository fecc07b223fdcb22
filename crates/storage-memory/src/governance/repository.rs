use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use whalepod_core::errors::{Error, Result};
use whalepod_core::governance::{
    GovernanceError, NewVoteRecord, Proposal, ProposalRepositoryTrait, ProposalResult,
    ProposalStatus, Vote, VoteRepositoryTrait, VoteTally,
};
use whalepod_core::utils::Clock;

/// In-memory proposal repository.
pub struct MemoryProposalRepository {
    proposals: DashMap<String, Proposal>,
    clock: Arc<dyn Clock>,
}

impl MemoryProposalRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            proposals: DashMap::new(),
            clock,
        }
    }

    fn with_proposal<F>(&self, proposal_id: &str, mutate: F) -> Result<Proposal>
    where
        F: FnOnce(&mut Proposal) -> Result<()>,
    {
        let mut proposal = self
            .proposals
            .get_mut(proposal_id)
            .ok_or_else(|| GovernanceError::ProposalNotFound(proposal_id.to_string()))?;
        mutate(&mut proposal)?;
        proposal.updated_at = self.clock.now();
        Ok(proposal.clone())
    }
}

#[async_trait]
impl ProposalRepositoryTrait for MemoryProposalRepository {
    async fn insert(&self, proposal: Proposal) -> Result<Proposal> {
        self.proposals
            .insert(proposal.id.clone(), proposal.clone());
        Ok(proposal)
    }

    fn get_by_id(&self, proposal_id: &str) -> Result<Proposal> {
        self.proposals
            .get(proposal_id)
            .map(|proposal| proposal.clone())
            .ok_or_else(|| GovernanceError::ProposalNotFound(proposal_id.to_string()).into())
    }

    fn list(&self, status_filter: Option<ProposalStatus>) -> Result<Vec<Proposal>> {
        let mut proposals: Vec<Proposal> = self
            .proposals
            .iter()
            .filter(|entry| status_filter.map_or(true, |status| entry.status == status))
            .map(|entry| entry.clone())
            .collect();
        proposals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(proposals)
    }

    async fn set_status(
        &self,
        proposal_id: &str,
        expected: ProposalStatus,
        status: ProposalStatus,
        result: Option<ProposalResult>,
    ) -> Result<Proposal> {
        // Checked and swapped under the entry lock, so racing transitions
        // from the same status admit exactly one winner.
        self.with_proposal(proposal_id, |proposal| {
            if proposal.status != expected {
                return Err(GovernanceError::InvalidProposalTransition {
                    status: proposal.status,
                    action: format!("transition to {status:?}"),
                }
                .into());
            }
            proposal.status = status;
            if result.is_some() {
                proposal.result = result;
            }
            Ok(())
        })
    }

    async fn update_tally(&self, proposal_id: &str, tally: VoteTally) -> Result<Proposal> {
        self.with_proposal(proposal_id, |proposal| {
            proposal.tally = tally;
            Ok(())
        })
    }
}

/// In-memory vote repository.
///
/// The ballot claim set enforces one vote per (proposal, user): the map
/// entry is taken atomically, so concurrent claims resolve to exactly one
/// winner even before the vote row exists.
#[derive(Default)]
pub struct MemoryVoteRepository {
    claims: DashSet<(String, String)>,
    votes: Mutex<Vec<Vote>>,
}

impl MemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteRepositoryTrait for MemoryVoteRepository {
    async fn claim_ballot(&self, proposal_id: &str, user_id: &str) -> Result<()> {
        let claimed = self
            .claims
            .insert((proposal_id.to_string(), user_id.to_string()));
        if claimed {
            Ok(())
        } else {
            Err(GovernanceError::AlreadyVoted {
                proposal_id: proposal_id.to_string(),
                user_id: user_id.to_string(),
            }
            .into())
        }
    }

    async fn release_ballot(&self, proposal_id: &str, user_id: &str) -> Result<()> {
        self.claims
            .remove(&(proposal_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn insert_vote(&self, record: NewVoteRecord) -> Result<Vote> {
        let vote = Vote {
            id: Uuid::new_v4().to_string(),
            proposal_id: record.proposal_id,
            user_id: record.user_id,
            position: record.position,
            vote_strength: record.vote_strength,
            points_cost: record.points_cost,
            justification: record.justification,
            created_at: record.created_at,
        };
        let mut votes = self.votes.lock().map_err(|_| poisoned())?;
        votes.push(vote.clone());
        Ok(vote)
    }

    fn votes_for_proposal(&self, proposal_id: &str) -> Result<Vec<Vote>> {
        let votes = self.votes.lock().map_err(|_| poisoned())?;
        Ok(votes
            .iter()
            .filter(|vote| vote.proposal_id == proposal_id)
            .cloned()
            .collect())
    }
}

fn poisoned() -> Error {
    Error::Repository("vote lock poisoned".to_string())
}
