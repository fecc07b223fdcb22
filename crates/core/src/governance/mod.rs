//! Governance voting engine - proposals, quadratic voting, finalization.

mod governance_constants;
mod governance_errors;
mod governance_model;
mod governance_service;
mod governance_traits;

pub use governance_constants::*;
pub use governance_errors::GovernanceError;
pub use governance_model::{
    EligibilityProfile, NewProposal, NewVote, NewVoteRecord, Proposal, ProposalCategory,
    ProposalResult, ProposalStatus, Vote, VotePosition, VoteTally,
};
pub use governance_service::GovernanceService;
pub use governance_traits::{
    EligibilityProviderTrait, GovernanceServiceTrait, ProposalRepositoryTrait, VoteRepositoryTrait,
};
