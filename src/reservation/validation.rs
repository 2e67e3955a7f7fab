//! Request validation.
//!
//! Checks run in a fixed order and stop at the first failure, so the caller
//! gets a single precise message.

use crate::accounts::resolver::AccountTarget;
use crate::ledger::types::CorrelationHeaders;
use crate::reservation::error::ReserveFundsError;
use crate::reservation::types::{ReserveFundsCommand, ReserveFundsRequest};

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Reject headers without a correlation id.
pub fn validate_headers(headers: &CorrelationHeaders) -> Result<(), ReserveFundsError> {
    if headers.correlation_id.trim().is_empty() {
        tracing::error!("Malformed request. Missing correlation id");
        return Err(ReserveFundsError::Validation(
            "Missing header variable correlation-id".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_request(request: ReserveFundsRequest) -> Result<ReserveFundsCommand, ReserveFundsError> {
    let request_uuid = request.request_uuid.ok_or_else(|| {
        tracing::error!("Malformed request. Missing request_uuid");
        ReserveFundsError::Validation("Missing request_uuid".to_string())
    })?;

    let target = match (
        present(&request.account_number),
        present(&request.debit_card_number),
    ) {
        (Some(_), Some(_)) => {
            tracing::error!(%request_uuid, "Malformed request. Both account and debit card given");
            return Err(ReserveFundsError::Validation(
                "Specify only one: account_number or debit_card_number".to_string(),
            ));
        }
        (None, None) => {
            tracing::error!(%request_uuid, "Malformed request. Neither account nor debit card given");
            return Err(ReserveFundsError::Validation(
                "Specify at least one: account_number or debit_card_number".to_string(),
            ));
        }
        (Some(account), None) => AccountTarget::Account(account.to_string()),
        (None, Some(card)) => AccountTarget::DebitCard(card.to_string()),
    };

    let transaction_meta_data_json = match present(&request.transaction_meta_data_json) {
        Some(meta) => meta.to_string(),
        None => {
            tracing::error!(%request_uuid, "Malformed request. Missing transaction metadata");
            return Err(ReserveFundsError::Validation(
                "Missing transaction_meta_data_json".to_string(),
            ));
        }
    };

    if request.transaction_amount == 0 {
        tracing::error!(%request_uuid, "Malformed request. Zero amount");
        return Err(ReserveFundsError::Validation(
            "Transaction Amount must not be zero(0).".to_string(),
        ));
    }

    Ok(ReserveFundsCommand {
        request_uuid,
        target,
        transaction_amount: request.transaction_amount,
        transaction_meta_data_json,
        protect_against_overdraft: request.protect_against_overdraft,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn valid() -> ReserveFundsRequest {
        ReserveFundsRequest {
            request_uuid: Some(Uuid::new_v4()),
            account_number: Some("1234HHHH1234".into()),
            debit_card_number: None,
            transaction_amount: -27384,
            transaction_meta_data_json: Some("{}".into()),
            protect_against_overdraft: true,
        }
    }

    fn message(request: ReserveFundsRequest) -> String {
        match validate_request(request) {
            Err(ReserveFundsError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_account_request() {
        let request = valid();
        let uuid = request.request_uuid.unwrap();
        let command = validate_request(request).unwrap();
        assert_eq!(command.request_uuid, uuid);
        assert_eq!(command.target, AccountTarget::Account("1234HHHH1234".into()));
        assert!(command.protect_against_overdraft);
    }

    #[test]
    fn test_valid_card_request() {
        let mut request = valid();
        request.account_number = Some(String::new());
        request.debit_card_number = Some("4000123412341234".into());
        let command = validate_request(request).unwrap();
        assert_eq!(command.target, AccountTarget::DebitCard("4000123412341234".into()));
    }

    #[test]
    fn test_missing_request_uuid() {
        let mut request = valid();
        request.request_uuid = None;
        assert_eq!(message(request), "Missing request_uuid");
    }

    #[test]
    fn test_account_and_card_exclusive() {
        let mut both = valid();
        both.debit_card_number = Some("4000".into());
        assert!(message(both).starts_with("Specify only one"));

        let mut neither = valid();
        neither.account_number = None;
        assert!(message(neither).starts_with("Specify at least one"));
    }

    #[test]
    fn test_metadata_and_amount_required() {
        let mut no_meta = valid();
        no_meta.transaction_meta_data_json = Some("  ".into());
        assert_eq!(message(no_meta), "Missing transaction_meta_data_json");

        let mut zero = valid();
        zero.transaction_amount = 0;
        assert_eq!(message(zero), "Transaction Amount must not be zero(0).");
    }

    #[test]
    fn test_correlation_id_required() {
        assert!(validate_headers(&CorrelationHeaders::default()).is_err());
        assert!(validate_headers(&CorrelationHeaders {
            correlation_id: "273849273498273498".into(),
            ..Default::default()
        })
        .is_ok());
    }
}
