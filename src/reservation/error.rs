//! Errors surfaced by `reserve_funds`.

use thiserror::Error;

use crate::accounts::store::StoreError;
use crate::ledger::types::LedgerError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReserveFundsError {
    /// Caller input was malformed. Nothing was read or reserved.
    #[error("Malformed request: {0}")]
    Validation(String),

    /// Account or card exists but is not in good standing.
    #[error("Unprocessable state: {0}")]
    UnprocessableState(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ledger call failed; for transport errors the retry budget is spent.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ReserveFundsError {
    /// Whether the failure came from the ledger transport after all retries.
    pub fn is_fatal_transport(&self) -> bool {
        matches!(self, ReserveFundsError::Ledger(e) if e.is_transient())
    }
}
