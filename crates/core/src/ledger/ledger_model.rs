//! Ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::PointAmount;
use crate::constants::PUBLIC_POOL_NAME;

use super::ledger_errors::LedgerError;

/// Closed set of transaction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    DailyCheckin,
    AssetReward,
    Transfer,
    ProposalCreation,
    ProposalRefund,
    ProposalVote,
    GovernanceReward,
    PublicPoolIncome,
    PublicPoolExpense,
    PointBurn,
}

impl TransactionType {
    /// True for the two categories that make up the public pool balance.
    pub fn is_pool_flow(&self) -> bool {
        matches!(
            self,
            TransactionType::PublicPoolIncome | TransactionType::PublicPoolExpense
        )
    }

    /// True for reward categories counted against the daily earning cap.
    pub fn counts_toward_daily_cap(&self) -> bool {
        matches!(
            self,
            TransactionType::DailyCheckin | TransactionType::AssetReward
        )
    }
}

/// Reference from a transaction to the entity that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelatedEntity {
    Proposal(String),
    Vote(String),
    AssetItem(String),
}

/// Immutable record of a single balance movement.
///
/// `user_id` is `None` for public pool flows and burns. Replaying all
/// transactions of an account in creation order reproduces its balance;
/// each record's `balance_after` snapshots the owning balance right after
/// the movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointTransaction {
    pub id: String,
    pub user_id: Option<String>,
    pub transaction_type: TransactionType,
    /// Signed: positive = credit, negative = debit.
    pub amount: PointAmount,
    pub balance_after: PointAmount,
    pub description: String,
    pub related: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
}

/// Fully prepared transaction, missing only the storage-assigned id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Option<String>,
    pub transaction_type: TransactionType,
    pub amount: PointAmount,
    pub balance_after: PointAmount,
    pub description: String,
    pub related: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
}

/// The balance view of a user account owned by the identity subsystem.
///
/// The economic core only ever mutates the three balance fields, and only
/// through a ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointAccount {
    pub id: String,
    pub points_balance: PointAmount,
    pub total_points_earned: PointAmount,
    pub total_points_spent: PointAmount,
    pub is_verified: bool,
    pub whale_nft_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl PointAccount {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            points_balance: PointAmount::ZERO,
            total_points_earned: PointAmount::ZERO,
            total_points_spent: PointAmount::ZERO,
            is_verified: false,
            whale_nft_count: 0,
            updated_at: now,
        }
    }
}

/// The account a ledger entry targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerAccount {
    User(String),
    PublicPool,
}

impl LedgerAccount {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            LedgerAccount::User(id) => Some(id),
            LedgerAccount::PublicPool => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            LedgerAccount::User(id) => id,
            LedgerAccount::PublicPool => PUBLIC_POOL_NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDirection {
    Credit,
    Debit,
}

/// A prepared single-account mutation.
///
/// The balance arithmetic lives in [`LedgerEntry::apply`]; the storage layer
/// executes it while holding the target account's lock, so the read of the
/// balance, the invariant check, and the write are indivisible per account.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub account: LedgerAccount,
    pub direction: EntryDirection,
    /// Positive magnitude; the sign is carried by `direction`.
    pub amount: PointAmount,
    pub transaction_type: TransactionType,
    pub description: String,
    pub related: Option<RelatedEntity>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The signed amount recorded on the transaction.
    pub fn signed_amount(&self) -> PointAmount {
        match self.direction {
            EntryDirection::Credit => self.amount,
            EntryDirection::Debit => -self.amount,
        }
    }

    /// Applies this entry to a user account, mutating its balance fields and
    /// returning the transaction to append.
    ///
    /// Must be called with the account's lock held. On error the account is
    /// untouched.
    pub fn apply(&self, account: &mut PointAccount) -> Result<NewTransaction, LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "entry amount must be positive, got {}",
                self.amount
            )));
        }
        let new_balance = match self.direction {
            EntryDirection::Credit => account.points_balance + self.amount,
            EntryDirection::Debit => {
                if account.points_balance < self.amount {
                    return Err(LedgerError::InsufficientBalance {
                        account: account.id.clone(),
                        available: account.points_balance,
                        requested: self.amount,
                    });
                }
                account.points_balance - self.amount
            }
        };
        match self.direction {
            EntryDirection::Credit => {
                account.total_points_earned += self.amount;
            }
            EntryDirection::Debit => {
                account.total_points_spent += self.amount;
            }
        }
        account.points_balance = new_balance;
        account.updated_at = self.created_at;
        Ok(NewTransaction {
            user_id: Some(account.id.clone()),
            transaction_type: self.transaction_type,
            amount: self.signed_amount(),
            balance_after: new_balance,
            description: self.description.clone(),
            related: self.related.clone(),
            created_at: self.created_at,
        })
    }
}

/// Derived public pool balance: the sum of pool income and (negative) pool
/// expense amounts. The pool balance is never stored directly.
pub fn pool_balance_of<'a, I>(transactions: I) -> PointAmount
where
    I: IntoIterator<Item = &'a PointTransaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.user_id.is_none() && tx.transaction_type.is_pool_flow())
        .map(|tx| tx.amount)
        .sum()
}
