//! Valuation error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValuationError {
    /// The market-data collaborator failed. Handled internally by degrading
    /// to the estimated-price table; never surfaced to reward callers.
    #[error("Market data unavailable for collection {0}")]
    InputUnavailable(String),

    #[error("Valuation history unavailable: {0}")]
    HistoryUnavailable(String),
}
