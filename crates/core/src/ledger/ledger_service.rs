use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::ledger_errors::LedgerError;
use super::ledger_model::{
    pool_balance_of, EntryDirection, LedgerAccount, LedgerEntry, PointAccount, PointTransaction,
    RelatedEntity, TransactionType,
};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::amount::PointAmount;
use crate::errors::Result;
use crate::settings::EconomySettings;
use crate::utils::Clock;

/// Service owning all balance mutations.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    clock: Arc<dyn Clock>,
    settings: EconomySettings,
}

impl LedgerService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        clock: Arc<dyn Clock>,
        settings: EconomySettings,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    /// Rejects non-positive and sub-minimum amounts.
    fn validate_amount(&self, amount: PointAmount) -> Result<()> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must be positive, got {amount}"
            ))
            .into());
        }
        if amount < self.settings.min_transaction_unit {
            return Err(LedgerError::InvalidAmount(format!(
                "amount {amount} is below the minimum transaction unit {}",
                self.settings.min_transaction_unit
            ))
            .into());
        }
        Ok(())
    }

    fn user_entry(
        &self,
        account_id: &str,
        direction: EntryDirection,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> LedgerEntry {
        LedgerEntry {
            account: LedgerAccount::User(account_id.to_string()),
            direction,
            amount,
            transaction_type,
            description: description.to_string(),
            related,
            created_at: self.clock.now(),
        }
    }

    fn pool_entry(
        &self,
        direction: EntryDirection,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> LedgerEntry {
        LedgerEntry {
            account: LedgerAccount::PublicPool,
            direction,
            amount,
            transaction_type,
            description: description.to_string(),
            related,
            created_at: self.clock.now(),
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn get_account(&self, account_id: &str) -> Result<PointAccount> {
        self.repository.get_account(account_id)
    }

    async fn credit(
        &self,
        account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<PointTransaction> {
        self.validate_amount(amount)?;
        debug!("Crediting {amount} to {account_id} ({transaction_type:?})");
        let entry = self.user_entry(
            account_id,
            EntryDirection::Credit,
            amount,
            transaction_type,
            description,
            related,
        );
        self.repository.apply_entry(entry).await
    }

    async fn debit(
        &self,
        account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<PointTransaction> {
        self.validate_amount(amount)?;
        debug!("Debiting {amount} from {account_id} ({transaction_type:?})");
        let entry = self.user_entry(
            account_id,
            EntryDirection::Debit,
            amount,
            transaction_type,
            description,
            related,
        );
        self.repository.apply_entry(entry).await
    }

    async fn transfer(
        &self,
        from_account_id: &str,
        to_account_id: &str,
        amount: PointAmount,
        description: &str,
    ) -> Result<(PointTransaction, PointTransaction)> {
        self.validate_amount(amount)?;
        if from_account_id == to_account_id {
            return Err(LedgerError::InvalidAmount(
                "transfer source and destination must differ".to_string(),
            )
            .into());
        }
        let debit = self.user_entry(
            from_account_id,
            EntryDirection::Debit,
            amount,
            TransactionType::Transfer,
            description,
            None,
        );
        let credit = self.user_entry(
            to_account_id,
            EntryDirection::Credit,
            amount,
            TransactionType::Transfer,
            description,
            None,
        );
        self.repository.apply_transfer(debit, credit).await
    }

    async fn collect_to_pool(
        &self,
        from_account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<(PointTransaction, PointTransaction)> {
        self.validate_amount(amount)?;
        let debit = self.user_entry(
            from_account_id,
            EntryDirection::Debit,
            amount,
            transaction_type,
            description,
            related.clone(),
        );
        let income = self.pool_entry(
            EntryDirection::Credit,
            amount,
            TransactionType::PublicPoolIncome,
            description,
            related,
        );
        self.repository.apply_transfer(debit, income).await
    }

    async fn payout_from_pool(
        &self,
        to_account_id: &str,
        amount: PointAmount,
        transaction_type: TransactionType,
        description: &str,
        related: Option<RelatedEntity>,
    ) -> Result<(PointTransaction, PointTransaction)> {
        self.validate_amount(amount)?;
        let expense = self.pool_entry(
            EntryDirection::Debit,
            amount,
            TransactionType::PublicPoolExpense,
            description,
            related.clone(),
        );
        let credit = self.user_entry(
            to_account_id,
            EntryDirection::Credit,
            amount,
            transaction_type,
            description,
            related,
        );
        self.repository.apply_transfer(expense, credit).await
    }

    async fn burn(&self, amount: PointAmount, reason: &str) -> Result<PointTransaction> {
        self.validate_amount(amount)?;
        debug!("Burning {amount}: {reason}");
        let entry = self.pool_entry(
            EntryDirection::Debit,
            amount,
            TransactionType::PointBurn,
            reason,
            None,
        );
        self.repository.apply_entry(entry).await
    }

    fn public_pool_balance(&self) -> Result<PointAmount> {
        let transactions = self
            .repository
            .list_transactions(Some(&LedgerAccount::PublicPool))?;
        Ok(pool_balance_of(transactions.iter()))
    }

    fn transactions_for_user(&self, user_id: &str) -> Result<Vec<PointTransaction>> {
        self.repository
            .list_transactions(Some(&LedgerAccount::User(user_id.to_string())))
    }

    fn verify_replay(&self, account_id: &str) -> Result<bool> {
        let account = self.repository.get_account(account_id)?;
        let transactions = self.transactions_for_user(account_id)?;
        let mut running = PointAmount::ZERO;
        for tx in &transactions {
            running += tx.amount;
            if tx.balance_after != running {
                warn!(
                    "Replay mismatch on {account_id}: transaction {} has balanceAfter {} but running sum {}",
                    tx.id, tx.balance_after, running
                );
                return Ok(false);
            }
        }
        if running != account.points_balance {
            warn!(
                "Replay mismatch on {account_id}: running sum {} differs from balance {}",
                running, account.points_balance
            );
            return Ok(false);
        }
        Ok(true)
    }
}
