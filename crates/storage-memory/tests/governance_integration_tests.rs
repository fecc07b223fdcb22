use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use whalepod_core::errors::{Error, Result};
use whalepod_core::governance::{
    EligibilityProfile, EligibilityProviderTrait, GovernanceError, GovernanceService,
    GovernanceServiceTrait, NewProposal, NewVote, ProposalCategory, ProposalResult,
    ProposalStatus, VotePosition,
};
use whalepod_core::ledger::{
    LedgerRepositoryTrait, LedgerService, LedgerServiceTrait, PointAccount, TransactionType,
};
use whalepod_core::utils::Clock;
use whalepod_core::{EconomySettings, PointAmount};
use whalepod_storage_memory::{
    MemoryLedgerRepository, MemoryProposalRepository, MemoryVoteRepository,
};

struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        })
    }

    fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

struct AllEligible;

#[async_trait]
impl EligibilityProviderTrait for AllEligible {
    async fn profile(&self, _user_id: &str) -> Result<EligibilityProfile> {
        Ok(EligibilityProfile {
            is_verified: true,
            whale_nft_count: 2,
            avatar_from_verified_item: true,
        })
    }
}

struct Stack {
    clock: Arc<TestClock>,
    ledger: Arc<LedgerService>,
    governance: Arc<GovernanceService>,
}

// Seed balances through real credits so every balance replays from the log.
async fn setup(balances: &[(&str, PointAmount)]) -> Stack {
    let clock = TestClock::new();
    let repository = Arc::new(MemoryLedgerRepository::new());
    for (id, _) in balances {
        repository
            .upsert_account(PointAccount::new(*id, clock.now()))
            .await
            .unwrap();
    }
    let ledger = Arc::new(LedgerService::new(
        repository,
        clock.clone(),
        EconomySettings::default(),
    ));
    for (id, balance) in balances {
        if balance.is_positive() {
            ledger
                .credit(id, *balance, TransactionType::AssetReward, "initial grant", None)
                .await
                .unwrap();
        }
    }
    let governance = Arc::new(GovernanceService::new(
        Arc::new(MemoryProposalRepository::new(clock.clone())),
        Arc::new(MemoryVoteRepository::new()),
        ledger.clone(),
        Arc::new(AllEligible),
        clock.clone(),
        EconomySettings::default(),
    ));
    Stack {
        clock,
        ledger,
        governance,
    }
}

fn week_long_proposal(now: DateTime<Utc>) -> NewProposal {
    NewProposal {
        title: "Add a community spotlight page".to_string(),
        description: "Surface notable collections on the landing page".to_string(),
        category: ProposalCategory::Feature,
        voting_start_at: now,
        voting_end_at: now + Duration::days(7),
        min_points_to_vote: PointAmount::ZERO,
    }
}

#[tokio::test]
async fn proposal_bond_moves_from_creator_to_pool() {
    let stack = setup(&[("carol", PointAmount::from(1500u32))]).await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    assert_eq!(proposal.status, ProposalStatus::Draft);
    assert_eq!(
        stack.ledger.get_account("carol").unwrap().points_balance,
        PointAmount::from(500u32)
    );
    assert_eq!(
        stack.ledger.public_pool_balance().unwrap(),
        PointAmount::from(1000u32)
    );
    assert!(stack.ledger.verify_replay("carol").unwrap());
}

#[tokio::test]
async fn quadratic_vote_costs_strength_squared() {
    let stack = setup(&[
        ("carol", PointAmount::from(1500u32)),
        ("alice", PointAmount::from(200u32)),
    ])
    .await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    stack
        .governance
        .approve_proposal(&proposal.id, "admin")
        .await
        .unwrap();

    let vote = stack
        .governance
        .cast_vote(
            &proposal.id,
            "alice",
            NewVote {
                position: VotePosition::For,
                vote_strength: 10,
                justification: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(vote.points_cost, PointAmount::from(100u32));
    assert_eq!(
        stack.ledger.get_account("alice").unwrap().points_balance,
        PointAmount::from(100u32)
    );
    let proposal = stack.governance.get_proposal(&proposal.id).unwrap();
    assert_eq!(proposal.tally.count_for, 10);
    assert_eq!(proposal.tally.points_for, PointAmount::from(100u32));
}

#[tokio::test]
async fn full_lifecycle_pays_the_creator_on_approval() {
    let stack = setup(&[
        ("carol", PointAmount::from(2000u32)),
        ("alice", PointAmount::from(500u32)),
        ("bob", PointAmount::from(500u32)),
    ])
    .await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    // Approval pays the incentive: 0.01% of the 1000-point pool.
    stack
        .governance
        .approve_proposal(&proposal.id, "admin")
        .await
        .unwrap();
    assert_eq!(
        stack.ledger.get_account("carol").unwrap().points_balance,
        PointAmount::new(dec!(1000.1))
    );

    stack
        .governance
        .cast_vote(
            &proposal.id,
            "alice",
            NewVote {
                position: VotePosition::For,
                vote_strength: 10,
                justification: Some("useful feature".to_string()),
            },
        )
        .await
        .unwrap();
    stack
        .governance
        .cast_vote(
            &proposal.id,
            "bob",
            NewVote {
                position: VotePosition::Against,
                vote_strength: 3,
                justification: None,
            },
        )
        .await
        .unwrap();

    stack.clock.advance(Duration::days(8));
    let finalized = stack
        .governance
        .finalize_proposal(&proposal.id)
        .await
        .unwrap();
    // 10 for vs 3 against: 76.9% >= 66.7%.
    assert_eq!(finalized.status, ProposalStatus::Ended);
    assert_eq!(finalized.result, Some(ProposalResult::Approved));

    // Creator reward: 10% of the 109 points spent on votes.
    assert_eq!(
        stack.ledger.get_account("carol").unwrap().points_balance,
        PointAmount::new(dec!(1011.0))
    );
    // Pool: 1000 - 0.1 incentive + 109 vote points - 10.9 reward.
    assert_eq!(
        stack.ledger.public_pool_balance().unwrap(),
        PointAmount::new(dec!(1098.0))
    );
    for user in ["carol", "alice", "bob"] {
        assert!(stack.ledger.verify_replay(user).unwrap(), "replay for {user}");
    }
}

#[tokio::test]
async fn rejection_refunds_the_full_bond() {
    let stack = setup(&[("carol", PointAmount::from(1500u32))]).await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    let rejected = stack
        .governance
        .reject_proposal(&proposal.id, "admin", "duplicate")
        .await
        .unwrap();
    assert_eq!(rejected.status, ProposalStatus::Cancelled);
    assert_eq!(
        stack.ledger.get_account("carol").unwrap().points_balance,
        PointAmount::from(1500u32)
    );
    assert_eq!(stack.ledger.public_pool_balance().unwrap(), PointAmount::ZERO);
}

#[tokio::test]
async fn finalize_with_no_votes_is_a_tie() {
    let stack = setup(&[("carol", PointAmount::from(1500u32))]).await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    stack
        .governance
        .approve_proposal(&proposal.id, "admin")
        .await
        .unwrap();
    stack.clock.advance(Duration::days(8));
    let finalized = stack
        .governance
        .finalize_proposal(&proposal.id)
        .await
        .unwrap();
    assert_eq!(finalized.result, Some(ProposalResult::Tied));
    // Repository timestamps come from the injected clock.
    assert_eq!(finalized.updated_at, stack.clock.now());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_finalizations_pay_the_creator_reward_once() {
    let stack = setup(&[
        ("carol", PointAmount::from(1500u32)),
        ("alice", PointAmount::from(500u32)),
    ])
    .await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    stack
        .governance
        .approve_proposal(&proposal.id, "admin")
        .await
        .unwrap();
    stack
        .governance
        .cast_vote(
            &proposal.id,
            "alice",
            NewVote {
                position: VotePosition::For,
                vote_strength: 10,
                justification: None,
            },
        )
        .await
        .unwrap();
    stack.clock.advance(Duration::days(8));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let governance = stack.governance.clone();
        let proposal_id = proposal.id.clone();
        handles.push(tokio::spawn(
            async move { governance.finalize_proposal(&proposal_id).await },
        ));
    }
    let results: Vec<Result<_>> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one finalizer ends the proposal");
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result.as_ref().unwrap_err(),
            Error::Governance(GovernanceError::InvalidProposalTransition { .. })
        ));
    }
    // Exactly one 10% creator reward landed: 1500 - bond 1000 + 0.1
    // incentive + 10.0 reward.
    assert_eq!(
        stack.ledger.get_account("carol").unwrap().points_balance,
        PointAmount::new(dec!(510.1))
    );
    assert!(stack.ledger.verify_replay("carol").unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_duplicate_votes_debit_exactly_once() {
    let stack = setup(&[
        ("carol", PointAmount::from(1500u32)),
        ("alice", PointAmount::from(1000u32)),
    ])
    .await;
    let proposal = stack
        .governance
        .create_proposal("carol", week_long_proposal(stack.clock.now()))
        .await
        .unwrap();
    stack
        .governance
        .approve_proposal(&proposal.id, "admin")
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let governance = stack.governance.clone();
        let proposal_id = proposal.id.clone();
        handles.push(tokio::spawn(async move {
            governance
                .cast_vote(
                    &proposal_id,
                    "alice",
                    NewVote {
                        position: VotePosition::For,
                        vote_strength: 5,
                        justification: None,
                    },
                )
                .await
        }));
    }
    let results: Vec<Result<_>> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "the ballot slot admits exactly one vote");
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result.as_ref().unwrap_err(),
            Error::Governance(GovernanceError::AlreadyVoted { .. })
        ));
    }
    // A single 25-point debit landed.
    assert_eq!(
        stack.ledger.get_account("alice").unwrap().points_balance,
        PointAmount::from(975u32)
    );
    let proposal = stack.governance.get_proposal(&proposal.id).unwrap();
    assert_eq!(proposal.tally.count_for, 5);
}
