//! Core error types for the Whalepod points economy.
//!
//! This module defines storage-agnostic error types. Backend-specific errors
//! are converted to these types by the storage layer.

use thiserror::Error;

use crate::governance::GovernanceError;
use crate::ledger::LedgerError;
use crate::rewards::RewardError;
use crate::valuation::ValuationError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the points economy.
///
/// Storage-specific failures are carried in string form to keep this type
/// backend-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Governance operation failed: {0}")]
    Governance(#[from] GovernanceError),

    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Reward distribution failed: {0}")]
    Reward(#[from] RewardError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and configuration values.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] chrono::ParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
