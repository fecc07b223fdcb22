use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

use whalepod_core::errors::{Error, Result};
use whalepod_core::ledger::{
    LedgerError, LedgerRepositoryTrait, LedgerService, LedgerServiceTrait, PointAccount,
    TransactionType,
};
use whalepod_core::utils::Clock;
use whalepod_core::{EconomySettings, PointAmount};
use whalepod_storage_memory::MemoryLedgerRepository;

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

// Seed balances through real credits so every balance replays from the log.
async fn setup(balances: &[(&str, PointAmount)]) -> (Arc<LedgerService>, Arc<TestClock>) {
    let clock = TestClock::new();
    let repository = Arc::new(MemoryLedgerRepository::new());
    for (id, _) in balances {
        repository
            .upsert_account(PointAccount::new(*id, clock.now()))
            .await
            .unwrap();
    }
    let service = Arc::new(LedgerService::new(
        repository,
        clock.clone(),
        EconomySettings::default(),
    ));
    for (id, balance) in balances {
        if balance.is_positive() {
            service
                .credit(id, *balance, TransactionType::AssetReward, "initial grant", None)
                .await
                .unwrap();
        }
    }
    (service, clock)
}

#[tokio::test]
async fn mixed_flows_replay_to_the_stored_balance() {
    let (ledger, clock) = setup(&[
        ("alice", PointAmount::from(500u32)),
        ("bob", PointAmount::ZERO),
    ])
    .await;

    ledger
        .credit(
            "alice",
            PointAmount::new(dec!(10.12345678)),
            TransactionType::DailyCheckin,
            "check-in",
            None,
        )
        .await
        .unwrap();
    clock.advance(Duration::hours(1));
    ledger
        .transfer("alice", "bob", PointAmount::from(100u32), "gift")
        .await
        .unwrap();
    ledger
        .collect_to_pool(
            "alice",
            PointAmount::from(50u32),
            TransactionType::ProposalCreation,
            "bond",
            None,
        )
        .await
        .unwrap();
    ledger
        .payout_from_pool(
            "bob",
            PointAmount::new(dec!(12.5)),
            TransactionType::GovernanceReward,
            "reward",
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        ledger.get_account("alice").unwrap().points_balance,
        PointAmount::new(dec!(360.12345678))
    );
    assert_eq!(
        ledger.get_account("bob").unwrap().points_balance,
        PointAmount::new(dec!(112.5))
    );
    assert_eq!(
        ledger.public_pool_balance().unwrap(),
        PointAmount::new(dec!(37.5))
    );
    assert!(ledger.verify_replay("alice").unwrap());
    assert!(ledger.verify_replay("bob").unwrap());
}

#[tokio::test]
async fn transfer_to_unknown_account_rolls_back_the_debit() {
    let (ledger, _) = setup(&[("alice", PointAmount::from(10u32))]).await;
    let err = ledger
        .transfer("alice", "ghost", PointAmount::from(10u32), "gift")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::AccountNotFound(_))));
    assert_eq!(
        ledger.get_account("alice").unwrap().points_balance,
        PointAmount::from(10u32)
    );
    assert!(ledger.transactions_for_user("alice").unwrap().is_empty());
}

#[tokio::test]
async fn pool_payout_beyond_the_pool_mutates_nothing() {
    let (ledger, _) = setup(&[
        ("alice", PointAmount::from(100u32)),
        ("bob", PointAmount::ZERO),
    ])
    .await;
    ledger
        .collect_to_pool(
            "alice",
            PointAmount::from(30u32),
            TransactionType::ProposalCreation,
            "bond",
            None,
        )
        .await
        .unwrap();
    let err = ledger
        .payout_from_pool(
            "bob",
            PointAmount::from(31u32),
            TransactionType::GovernanceReward,
            "reward",
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::InsufficientBalance { .. })
    ));
    assert_eq!(ledger.public_pool_balance().unwrap(), PointAmount::from(30u32));
    assert_eq!(
        ledger.get_account("bob").unwrap().points_balance,
        PointAmount::ZERO
    );
}

#[tokio::test]
async fn burn_does_not_drain_the_pool() {
    let (ledger, _) = setup(&[("alice", PointAmount::from(100u32))]).await;
    ledger
        .collect_to_pool(
            "alice",
            PointAmount::from(40u32),
            TransactionType::ProposalCreation,
            "bond",
            None,
        )
        .await
        .unwrap();
    let tx = ledger
        .burn(PointAmount::from(7u32), "expired points")
        .await
        .unwrap();
    assert_eq!(tx.user_id, None);
    assert_eq!(tx.balance_after, PointAmount::ZERO);
    assert_eq!(ledger.public_pool_balance().unwrap(), PointAmount::from(40u32));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_debits_never_overdraw() {
    let (ledger, _) = setup(&[("alice", PointAmount::from(100u32))]).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .debit(
                    "alice",
                    PointAmount::from(25u32),
                    TransactionType::ProposalVote,
                    "vote",
                    None,
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
    assert_eq!(successes, 4, "only 100/25 debits can be satisfied");
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result.as_ref().unwrap_err(),
            Error::Ledger(LedgerError::InsufficientBalance { .. })
        ));
    }
    assert_eq!(
        ledger.get_account("alice").unwrap().points_balance,
        PointAmount::ZERO
    );
    assert!(ledger.verify_replay("alice").unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_opposing_transfers_do_not_deadlock() {
    let (ledger, _) = setup(&[
        ("alice", PointAmount::from(1000u32)),
        ("bob", PointAmount::from(1000u32)),
    ])
    .await;

    let mut handles = Vec::new();
    for i in 0..50u32 {
        let ledger = ledger.clone();
        let (from, to) = if i % 2 == 0 {
            ("alice", "bob")
        } else {
            ("bob", "alice")
        };
        handles.push(tokio::spawn(async move {
            ledger
                .transfer(from, to, PointAmount::from(1u32), "ping-pong")
                .await
                .unwrap();
        }));
    }
    futures::future::join_all(handles).await;

    // Equal traffic both ways: balances end where they started.
    assert_eq!(
        ledger.get_account("alice").unwrap().points_balance,
        PointAmount::from(1000u32)
    );
    assert_eq!(
        ledger.get_account("bob").unwrap().points_balance,
        PointAmount::from(1000u32)
    );
    assert!(ledger.verify_replay("alice").unwrap());
    assert!(ledger.verify_replay("bob").unwrap());
}
