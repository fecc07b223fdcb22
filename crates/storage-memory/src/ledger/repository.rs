use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use whalepod_core::constants::PUBLIC_POOL_NAME;
use whalepod_core::errors::{Error, Result};
use whalepod_core::ledger::{
    pool_balance_of, LedgerAccount, LedgerEntry, LedgerError, LedgerRepositoryTrait,
    NewTransaction, PointAccount, PointTransaction, TransactionType,
};
use whalepod_core::PointAmount;

type SharedAccount = Arc<Mutex<PointAccount>>;

/// In-memory ledger repository.
///
/// Accounts live behind per-account mutexes so operations on different
/// accounts proceed in parallel. The transaction log is the source of truth
/// for the public pool balance, so pool entries serialize through the log
/// lock. Lock order is accounts (sorted by id) before log; both paths keep
/// to it.
pub struct MemoryLedgerRepository {
    accounts: RwLock<HashMap<String, SharedAccount>>,
    log: Mutex<Vec<PointTransaction>>,
}

impl Default for MemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    fn account_handle(&self, account_id: &str) -> Result<SharedAccount> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()).into())
    }

    /// Prepares a pool transaction against the current log.
    ///
    /// Burns are an ownerless sink outside the pool balance, so they skip
    /// the coverage check and snapshot a zero balance.
    fn prepare_pool(log: &[PointTransaction], entry: &LedgerEntry) -> Result<NewTransaction> {
        if !entry.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "entry amount must be positive, got {}",
                entry.amount
            ))
            .into());
        }
        let signed = entry.signed_amount();
        let balance_after = if entry.transaction_type == TransactionType::PointBurn {
            PointAmount::ZERO
        } else {
            let balance = pool_balance_of(log.iter());
            if signed.is_negative() && balance < entry.amount {
                return Err(LedgerError::InsufficientBalance {
                    account: PUBLIC_POOL_NAME.to_string(),
                    available: balance,
                    requested: entry.amount,
                }
                .into());
            }
            balance + signed
        };
        Ok(NewTransaction {
            user_id: None,
            transaction_type: entry.transaction_type,
            amount: signed,
            balance_after,
            description: entry.description.clone(),
            related: entry.related.clone(),
            created_at: entry.created_at,
        })
    }

    fn finalize(draft: NewTransaction) -> PointTransaction {
        PointTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            transaction_type: draft.transaction_type,
            amount: draft.amount,
            balance_after: draft.balance_after,
            description: draft.description,
            related: draft.related,
            created_at: draft.created_at,
        }
    }

    /// Applies one leg against the working copies, leaving the real
    /// accounts untouched until both legs have succeeded.
    fn apply_leg(
        working: &mut HashMap<String, PointAccount>,
        log: &[PointTransaction],
        entry: &LedgerEntry,
    ) -> Result<NewTransaction> {
        match &entry.account {
            LedgerAccount::User(id) => {
                let account = working
                    .get_mut(id)
                    .ok_or_else(|| Error::from(LedgerError::AccountNotFound(id.clone())))?;
                Ok(entry.apply(account)?)
            }
            LedgerAccount::PublicPool => Self::prepare_pool(log, entry),
        }
    }
}

#[async_trait]
impl LedgerRepositoryTrait for MemoryLedgerRepository {
    fn get_account(&self, account_id: &str) -> Result<PointAccount> {
        let handle = self.account_handle(account_id)?;
        let account = handle.lock().map_err(|_| poisoned())?;
        Ok(account.clone())
    }

    async fn upsert_account(&self, account: PointAccount) -> Result<PointAccount> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        match accounts.get(&account.id) {
            Some(existing) => {
                // Overwrite in place so concurrent holders of the handle
                // observe the update.
                let mut guard = existing.lock().map_err(|_| poisoned())?;
                *guard = account.clone();
            }
            None => {
                accounts.insert(account.id.clone(), Arc::new(Mutex::new(account.clone())));
            }
        }
        Ok(account)
    }

    async fn apply_entry(&self, entry: LedgerEntry) -> Result<PointTransaction> {
        match &entry.account {
            LedgerAccount::User(id) => {
                let handle = self.account_handle(id)?;
                let mut account = handle.lock().map_err(|_| poisoned())?;
                let mut log = self.log.lock().map_err(|_| poisoned())?;
                let draft = entry.apply(&mut account)?;
                let transaction = Self::finalize(draft);
                log.push(transaction.clone());
                Ok(transaction)
            }
            LedgerAccount::PublicPool => {
                let mut log = self.log.lock().map_err(|_| poisoned())?;
                let draft = Self::prepare_pool(&log, &entry)?;
                let transaction = Self::finalize(draft);
                log.push(transaction.clone());
                Ok(transaction)
            }
        }
    }

    async fn apply_transfer(
        &self,
        debit: LedgerEntry,
        credit: LedgerEntry,
    ) -> Result<(PointTransaction, PointTransaction)> {
        let mut user_ids: Vec<&str> = [&debit.account, &credit.account]
            .into_iter()
            .filter_map(|account| account.user_id())
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let handles: Vec<(String, SharedAccount)> = user_ids
            .into_iter()
            .map(|id| self.account_handle(id).map(|handle| (id.to_string(), handle)))
            .collect::<Result<_>>()?;
        let mut guards: Vec<(String, MutexGuard<'_, PointAccount>)> = Vec::new();
        for (id, handle) in &handles {
            guards.push((id.clone(), handle.lock().map_err(|_| poisoned())?));
        }
        let mut log = self.log.lock().map_err(|_| poisoned())?;

        // Work on copies so a failed leg leaves nothing behind. At most one
        // leg targets the pool, so both pool checks against the unmodified
        // log stay valid.
        let mut working: HashMap<String, PointAccount> = guards
            .iter()
            .map(|(id, guard)| (id.clone(), (**guard).clone()))
            .collect();
        let debit_draft = Self::apply_leg(&mut working, &log, &debit)?;
        let credit_draft = Self::apply_leg(&mut working, &log, &credit)?;

        for (id, guard) in guards.iter_mut() {
            if let Some(updated) = working.remove(id) {
                **guard = updated;
            }
        }
        let debit_tx = Self::finalize(debit_draft);
        let credit_tx = Self::finalize(credit_draft);
        log.push(debit_tx.clone());
        log.push(credit_tx.clone());
        Ok((debit_tx, credit_tx))
    }

    fn list_transactions(&self, account: Option<&LedgerAccount>) -> Result<Vec<PointTransaction>> {
        let log = self.log.lock().map_err(|_| poisoned())?;
        Ok(log
            .iter()
            .filter(|tx| match account {
                None => true,
                Some(LedgerAccount::User(id)) => tx.user_id.as_deref() == Some(id),
                Some(LedgerAccount::PublicPool) => tx.user_id.is_none(),
            })
            .cloned()
            .collect())
    }
}

fn poisoned() -> Error {
    Error::Repository("ledger lock poisoned".to_string())
}
