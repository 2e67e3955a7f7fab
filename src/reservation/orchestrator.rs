//! Reservation orchestration.
//!
//! # States
//! ```text
//! RESOLVING → PRIMARY_ATTEMPT → DONE_SUCCESS
//!                             → DONE_INSUFFICIENT            (no overdraft protection)
//!                             → OVERDRAFT_SCAN → DONE_OVERDRAFT_SUCCESS
//!                                              → DONE_INSUFFICIENT
//! ```
//!
//! # Design Decisions
//! - Attempts are strictly sequential; at most one ledger call is in flight per request
//! - First overdraft success wins and ends the scan
//! - Every attempt's transaction is kept, in order, as the audit trail
//! - A ledger error on any attempt aborts the whole request

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::accounts::resolver::AccountResolver;
use crate::accounts::store::AccountStore;
use crate::ledger::client::LedgerService;
use crate::ledger::types::{CorrelationHeaders, ReservationRequest, ReservationStatus};
use crate::observability::metrics;
use crate::reservation::error::ReserveFundsError;
use crate::reservation::types::{
    ReserveFundsCommand, ReserveFundsOutcome, ReserveFundsRequest, ReserveFundsStatus,
};
use crate::reservation::validation::{validate_headers, validate_request};

/// Entry point of the reservation flow.
#[derive(Clone)]
pub struct ReservationService {
    resolver: AccountResolver,
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn LedgerService>,
}

impl ReservationService {
    /// `ledger` is expected to already carry retry behaviour.
    pub fn new(accounts: Arc<dyn AccountStore>, ledger: Arc<dyn LedgerService>) -> Self {
        Self {
            resolver: AccountResolver::new(accounts.clone()),
            accounts,
            ledger,
        }
    }

    /// Reserve funds for `request`, cascading to overdraft accounts if allowed.
    pub async fn reserve_funds(
        &self,
        headers: &CorrelationHeaders,
        request: ReserveFundsRequest,
    ) -> Result<ReserveFundsOutcome, ReserveFundsError> {
        let start = Instant::now();
        let result = match validate_headers(headers).and_then(|_| validate_request(request)) {
            Ok(command) => self.run(headers, &command).await,
            Err(e) => Err(e),
        };

        let label = match &result {
            Ok(outcome) => outcome.status.as_str(),
            Err(ReserveFundsError::Validation(_)) => "invalid",
            Err(ReserveFundsError::UnprocessableState(_)) => "unprocessable",
            Err(ReserveFundsError::Store(_)) => "store_error",
            Err(ReserveFundsError::Ledger(_)) => "ledger_error",
        };
        metrics::record_reservation(label, start);
        result
    }

    async fn run(
        &self,
        headers: &CorrelationHeaders,
        command: &ReserveFundsCommand,
    ) -> Result<ReserveFundsOutcome, ReserveFundsError> {
        let account_number = self.resolver.resolve(&command.target).await?;

        let outcome = self.primary_attempt(headers, command, &account_number).await?;

        if outcome.status == ReserveFundsStatus::InsufficientFunds && command.protect_against_overdraft {
            return self.overdraft_scan(headers, command, &account_number, outcome).await;
        }
        Ok(outcome)
    }

    async fn primary_attempt(
        &self,
        headers: &CorrelationHeaders,
        command: &ReserveFundsCommand,
        account_number: &str,
    ) -> Result<ReserveFundsOutcome, ReserveFundsError> {
        let request = ReservationRequest {
            account_number: account_number.to_string(),
            debit_card_number: command.target.debit_card_number().map(str::to_string),
            request_uuid: command.request_uuid,
            transaction_amount: command.transaction_amount,
            transaction_meta_data_json: command.transaction_meta_data_json.clone(),
            protect_against_overdraft: command.protect_against_overdraft,
        };

        let response = self.ledger.reserve(headers, &request).await?;
        let status = match response.status {
            ReservationStatus::Success => ReserveFundsStatus::Success,
            ReservationStatus::InsufficientFunds => ReserveFundsStatus::InsufficientFunds,
        };

        tracing::info!(
            request_uuid = %command.request_uuid,
            account_number,
            status = status.as_str(),
            "Primary reservation attempted"
        );
        Ok(ReserveFundsOutcome::primary(status, response.resource))
    }

    async fn overdraft_scan(
        &self,
        headers: &CorrelationHeaders,
        command: &ReserveFundsCommand,
        account_number: &str,
        mut outcome: ReserveFundsOutcome,
    ) -> Result<ReserveFundsOutcome, ReserveFundsError> {
        let instructions = self.accounts.get_overdraft_instructions(account_number).await?;
        let now = Utc::now();

        for instruction in instructions {
            if !instruction.is_eligible(now) {
                tracing::debug!(
                    request_uuid = %command.request_uuid,
                    overdraft_account = %instruction.overdraft_account.account_number,
                    sequence = instruction.sequence,
                    status = %instruction.lifecycle_status,
                    "Overdraft instruction not eligible"
                );
                continue;
            }

            // The card maps to the primary account only, so it is not sent here.
            let request = ReservationRequest {
                account_number: instruction.overdraft_account.account_number.clone(),
                debit_card_number: None,
                request_uuid: command.request_uuid,
                transaction_amount: command.transaction_amount,
                transaction_meta_data_json: command.transaction_meta_data_json.clone(),
                protect_against_overdraft: command.protect_against_overdraft,
            };

            let response = self.ledger.reserve(headers, &request).await?;
            match response.status {
                ReservationStatus::Success => {
                    metrics::record_overdraft_attempt("success");
                    tracing::info!(
                        request_uuid = %command.request_uuid,
                        overdraft_account = %request.account_number,
                        sequence = instruction.sequence,
                        "Overdraft reservation succeeded"
                    );
                    return Ok(outcome.record(ReserveFundsStatus::SuccessOverdraft, response.resource));
                }
                ReservationStatus::InsufficientFunds => {
                    metrics::record_overdraft_attempt("insufficient_funds");
                    tracing::debug!(
                        request_uuid = %command.request_uuid,
                        overdraft_account = %request.account_number,
                        sequence = instruction.sequence,
                        "Overdraft reservation declined"
                    );
                    outcome = outcome.record(ReserveFundsStatus::InsufficientFunds, response.resource);
                }
            }
        }

        tracing::info!(
            request_uuid = %command.request_uuid,
            attempts = outcome.transactions.len(),
            "Overdraft instructions exhausted"
        );
        Ok(outcome)
    }
}
