//! Points ledger - the single gate through which balances change.

mod ledger_constants;
mod ledger_errors;
mod ledger_model;
mod ledger_service;
mod ledger_traits;

pub use ledger_constants::*;
pub use ledger_errors::LedgerError;
pub use ledger_model::{
    pool_balance_of, EntryDirection, LedgerAccount, LedgerEntry, NewTransaction, PointAccount,
    PointTransaction, RelatedEntity, TransactionType,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
