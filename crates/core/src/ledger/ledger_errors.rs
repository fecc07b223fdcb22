//! Ledger error types.

use thiserror::Error;

use crate::amount::PointAmount;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount is non-positive or below the minimum transaction unit.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A debit would drive the balance below zero. No mutation happened.
    #[error("Insufficient balance on {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        account: String,
        available: PointAmount,
        requested: PointAmount,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),
}
