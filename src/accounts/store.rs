//! Read-only data access for accounts, debit cards and overdraft instructions.

use async_trait::async_trait;
use thiserror::Error;

use crate::accounts::types::{Account, DebitCard, OverdraftInstruction};

/// Errors raised by an [`AccountStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Zero rows matched the lookup.
    #[error("{0} not found")]
    NotFound(String),

    /// Rows were found but could not be mapped (e.g. a card without its account).
    #[error("Invalid data: {0}")]
    Invalid(String),

    /// The backing storage could not be reached.
    #[error("Account storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store lookups.
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_account(&self, account_number: &str) -> StoreResult<Account>;

    /// Fetch a card together with the account it belongs to.
    async fn get_debit_card_and_account(
        &self,
        debit_card_number: &str,
    ) -> StoreResult<(DebitCard, Account)>;

    /// Overdraft instructions protecting `account_number`, ascending by sequence.
    ///
    /// Fails with [`StoreError::NotFound`] when the account has no instructions at all.
    async fn get_overdraft_instructions(
        &self,
        account_number: &str,
    ) -> StoreResult<Vec<OverdraftInstruction>>;
}
