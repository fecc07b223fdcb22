//! Ledger repository and service traits.
//!
//! These traits define the contract for balance mutations without any
//! storage-specific types. The repository is responsible for atomicity:
//! applying an entry must be a single serializable unit against the target
//! account (row-level locking or compare-and-swap equivalent), and a
//! transfer must be all-or-nothing across its two entries. Operations on
//! different accounts may proceed in parallel; the public pool serializes
//! as one logical account.

use async_trait::async_trait;

use super::ledger_model::{
    LedgerAccount, LedgerEntry, PointAccount, PointTransaction, RelatedEntity, TransactionType,
};
use crate::amount::PointAmount;
use crate::errors::Result;

#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Retrieves the balance view of an account.
    fn get_account(&self, account_id: &str) -> Result<PointAccount>;

    /// Inserts or replaces an account record (identity-subsystem sync).
    async fn upsert_account(&self, account: PointAccount) -> Result<PointAccount>;

    /// Atomically applies a single entry: balance read, invariant check,
    /// balance write, and transaction append are indivisible with respect
    /// to other operations on the same account.
    ///
    /// For pool entries the implementation derives the running pool balance
    /// from the log and must reject an expense exceeding it.
    async fn apply_entry(&self, entry: LedgerEntry) -> Result<PointTransaction>;

    /// Applies a debit and a credit as one unit of work. If either side
    /// fails, neither account is mutated and nothing is appended.
    async fn apply_transfer(
        &self,
        debit: LedgerEntry,
        credit: LedgerEntry,
    ) -> Result<(PointTransaction, PointTransaction)>;

    /// Lists transactions in creation order, optionally filtered to one
    /// account (the pool included).
    fn list_transactions(&self, account: Option<&LedgerAccount>) -> Result<Vec<PointTransaction>>;
}

#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn get_account(&self, account_id: &str) -> Result<PointAccount>;

    /// Credits a user account. Fails with `InvalidAmount` when the amount is
    /// non-positive or below the minimum transaction unit.
    async fn credit(
        &self,
        account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<PointTransaction>;

    /// Debits a user account. Fails with `InsufficientBalance` (and performs
    /// no mutation) when the balance cannot cover the amount.
    async fn debit(
        &self,
        account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<PointTransaction>;

    /// Moves points between two user accounts as one unit of work.
    async fn transfer(
        &self,
        from_account_id: &str,
        to_account_id: &str,
        amount: PointAmount,
        description: &str,
    ) -> Result<(PointTransaction, PointTransaction)>;

    /// Debits a user and records the matching pool income atomically.
    async fn collect_to_pool(
        &self,
        from_account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<(PointTransaction, PointTransaction)>;

    /// Records a pool expense and credits a user atomically. Fails with
    /// `InsufficientBalance` when the pool cannot cover the amount.
    async fn payout_from_pool(
        &self,
        to_account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<(PointTransaction, PointTransaction)>;

    /// Records an ownerless negative transaction. Pure auditable sink; no
    /// balance is affected.
    async fn burn(&self, amount: PointAmount, reason: &str) -> Result<PointTransaction>;

    /// Derived pool balance (income plus negative expense amounts).
    fn public_pool_balance(&self) -> Result<PointAmount>;

    /// Transactions of one user account in creation order.
    fn transactions_for_user(&self, user_id: &str) -> Result<Vec<PointTransaction>>;

    /// Replays an account's transactions and checks both the running sum
    /// against the stored balance and every `balance_after` snapshot.
    fn verify_replay(&self, account_id: &str) -> Result<bool>;
}
