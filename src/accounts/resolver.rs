//! Account resolution.
//!
//! # Responsibilities
//! - Map a debit card to the account it draws on
//! - Reject cards and accounts that are not in good standing
//!
//! Exactly one of account number / card number is guaranteed by request validation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accounts::store::AccountStore;
use crate::reservation::error::ReserveFundsError;

/// What the caller asked to charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTarget {
    Account(String),
    DebitCard(String),
}

impl AccountTarget {
    /// Card number to report to the ledger on the primary attempt.
    pub fn debit_card_number(&self) -> Option<&str> {
        match self {
            AccountTarget::DebitCard(number) => Some(number),
            AccountTarget::Account(_) => None,
        }
    }
}

/// Resolves a request target to the canonical account number.
#[derive(Clone)]
pub struct AccountResolver {
    store: Arc<dyn AccountStore>,
}

impl AccountResolver {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, target: &AccountTarget) -> Result<String, ReserveFundsError> {
        match target {
            AccountTarget::Account(account_number) => {
                let account = self.store.get_account(account_number).await?;
                if !account.in_good_standing() {
                    tracing::warn!(
                        account_number = %account.account_number,
                        status = %account.lifecycle_status,
                        "Account not in good standing"
                    );
                    return Err(ReserveFundsError::UnprocessableState(
                        "Account is in an invalid state.".to_string(),
                    ));
                }
                Ok(account.account_number)
            }
            AccountTarget::DebitCard(debit_card_number) => {
                let (card, account) = self
                    .store
                    .get_debit_card_and_account(debit_card_number)
                    .await?;

                if !card.in_good_standing() {
                    tracing::warn!(
                        debit_card_number = %card.debit_card_number,
                        status = %card.lifecycle_status,
                        "Debit card not in good standing"
                    );
                    return Err(ReserveFundsError::UnprocessableState(
                        "Invalid Debit Card state.".to_string(),
                    ));
                }
                if !account.in_good_standing() {
                    tracing::warn!(
                        account_number = %account.account_number,
                        status = %account.lifecycle_status,
                        "Card account not in good standing"
                    );
                    return Err(ReserveFundsError::UnprocessableState(
                        "Account associated with debit card is in an invalid state.".to_string(),
                    ));
                }
                Ok(account.account_number)
            }
        }
    }
}
