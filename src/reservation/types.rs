//! Reserve-funds request and outcome types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::resolver::AccountTarget;
use crate::ledger::types::TransactionResource;

/// Inbound request as received on the wire.
///
/// Every field is optional here; [`crate::reservation::validation::validate_request`]
/// turns it into a [`ReserveFundsCommand`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveFundsRequest {
    pub request_uuid: Option<Uuid>,
    pub account_number: Option<String>,
    pub debit_card_number: Option<String>,
    /// Signed amount in minor units; reservations are usually negative.
    pub transaction_amount: i64,
    /// Opaque payload forwarded to the ledger unparsed.
    pub transaction_meta_data_json: Option<String>,
    pub protect_against_overdraft: bool,
}

/// A validated request, ready for orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveFundsCommand {
    pub request_uuid: Uuid,
    pub target: AccountTarget,
    pub transaction_amount: i64,
    pub transaction_meta_data_json: String,
    pub protect_against_overdraft: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReserveFundsStatus {
    /// Reserved on the primary account.
    Success,
    /// Reserved on one of the overdraft accounts.
    SuccessOverdraft,
    /// No account could cover the amount.
    InsufficientFunds,
}

impl ReserveFundsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReserveFundsStatus::Success => "SUCCESS",
            ReserveFundsStatus::SuccessOverdraft => "SUCCESS_OVERDRAFT",
            ReserveFundsStatus::InsufficientFunds => "INSUFFICIENT_FUNDS",
        }
    }
}

/// Result of a whole cascade.
///
/// `transactions` holds one entry per ledger attempt, in the order attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveFundsOutcome {
    pub status: ReserveFundsStatus,
    pub transactions: Vec<TransactionResource>,
}

impl ReserveFundsOutcome {
    /// Start an outcome from the primary attempt's transaction.
    pub fn primary(status: ReserveFundsStatus, transaction: TransactionResource) -> Self {
        Self {
            status,
            transactions: vec![transaction],
        }
    }

    /// Append an attempt and move to `status`.
    pub fn record(mut self, status: ReserveFundsStatus, transaction: TransactionResource) -> Self {
        self.status = status;
        self.transactions.push(transaction);
        self
    }
}
