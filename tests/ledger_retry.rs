//! Ledger client and retry policy against a live mock ledger.

mod common;

use common::{approve, ledger_reply, start_mock_ledger, test_config, MockReply};
use std::time::Duration;
use uuid::Uuid;

use reserve_funds::ledger::{
    CorrelationHeaders, HttpLedgerClient, LedgerError, LedgerService, ReservationRequest,
    ReservationStatus, TransportFailure,
};
use reserve_funds::resilience::{RetryPolicy, RetryingLedger};

fn headers() -> CorrelationHeaders {
    CorrelationHeaders {
        ait_id: "upstream-app".to_string(),
        business_taxonomy_id: "retail-payments".to_string(),
        correlation_id: "corr-7f3a".to_string(),
    }
}

fn request() -> ReservationRequest {
    ReservationRequest {
        account_number: "PRIMARY".to_string(),
        debit_card_number: None,
        request_uuid: Uuid::new_v4(),
        transaction_amount: -4200,
        transaction_meta_data_json: r#"{"merchant":"bookshop"}"#.to_string(),
        protect_against_overdraft: false,
    }
}

fn retrying(ledger: &common::MockLedger) -> RetryingLedger<HttpLedgerClient> {
    let config = test_config(ledger);
    let client = HttpLedgerClient::new(config.ledger.clone(), config.service.ait_id.clone()).unwrap();
    RetryingLedger::new(client, RetryPolicy::from(&config.retries))
}

#[tokio::test]
async fn test_timeouts_then_success() {
    let ledger = start_mock_ledger(|req, index| {
        if index < 2 {
            MockReply::Delay(Duration::from_secs(2), 200, ledger_reply(req, "SUCCESS"))
        } else {
            MockReply::Respond(200, ledger_reply(req, "SUCCESS"))
        }
    })
    .await;

    let request = request();
    let response = retrying(&ledger).reserve(&headers(), &request).await.unwrap();

    assert_eq!(response.status, ReservationStatus::Success);
    assert_eq!(response.resource.request_uuid, request.request_uuid);

    let seen = ledger.requests();
    assert_eq!(seen.len(), 3);
    for call in &seen {
        assert_eq!(call.body["request_uuid"], request.request_uuid.to_string());
    }
}

#[tokio::test]
async fn test_dropped_connections_then_success() {
    let ledger = start_mock_ledger(|req, index| {
        if index == 0 {
            MockReply::Close
        } else {
            MockReply::Respond(200, ledger_reply(req, "INSUFFICIENT_FUNDS"))
        }
    })
    .await;

    let response = retrying(&ledger).reserve(&headers(), &request()).await.unwrap();

    assert_eq!(response.status, ReservationStatus::InsufficientFunds);
    assert_eq!(ledger.call_count(), 2);
}

#[tokio::test]
async fn test_exhausted_retries_surface_timeout() {
    let ledger = start_mock_ledger(|req, _| {
        MockReply::Delay(Duration::from_secs(2), 200, ledger_reply(req, "SUCCESS"))
    })
    .await;

    let err = retrying(&ledger).reserve(&headers(), &request()).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(
        err,
        LedgerError::Transport {
            kind: TransportFailure::Timeout,
            ..
        }
    ));
    assert_eq!(ledger.call_count(), 3);
}

#[tokio::test]
async fn test_error_status_not_retried() {
    let ledger = start_mock_ledger(|_, _| {
        MockReply::Respond(503, r#"{"error":"ledger maintenance"}"#.to_string())
    })
    .await;

    let err = retrying(&ledger).reserve(&headers(), &request()).await.unwrap_err();

    match err {
        LedgerError::Rejected { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("ledger maintenance"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    assert_eq!(ledger.call_count(), 1);
}

#[tokio::test]
async fn test_redirect_is_final_not_retried() {
    let ledger = start_mock_ledger(|_, _| MockReply::Respond(302, String::new())).await;

    let err = retrying(&ledger).reserve(&headers(), &request()).await.unwrap_err();

    assert!(!err.is_transient());
    assert!(matches!(err, LedgerError::Rejected { status: 302, .. }));
    assert_eq!(ledger.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_body_not_retried() {
    let ledger = start_mock_ledger(|_, _| MockReply::Respond(200, "{\"payload\":".to_string())).await;

    let err = retrying(&ledger).reserve(&headers(), &request()).await.unwrap_err();

    assert!(matches!(err, LedgerError::Malformed(_)));
    assert_eq!(ledger.call_count(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = reserve_funds::config::ServiceConfig::default();
    config.ledger.url = format!("http://{}/Reservation", addr);
    config.retries.initial_delay_ms = 1;
    config.retries.max_delay_ms = 5;
    let client = HttpLedgerClient::new(config.ledger.clone(), "reserve-funds-test").unwrap();
    let ledger = RetryingLedger::new(client, RetryPolicy::from(&config.retries));

    let err = ledger.reserve(&headers(), &request()).await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_headers_forwarded() {
    let ledger = start_mock_ledger(approve).await;

    retrying(&ledger).reserve(&headers(), &request()).await.unwrap();

    let seen = ledger.requests();
    let call = &seen[0];
    assert_eq!(call.header("ait-id"), Some("reserve-funds-test"));
    assert_eq!(call.header("business-taxonomy-id"), Some("retail-payments"));
    assert_eq!(call.header("correlation-id"), Some("corr-7f3a"));
    assert_eq!(call.header("content-type"), Some("application/json"));
    assert_eq!(call.body["transaction_meta_data_json"], r#"{"merchant":"bookshop"}"#);
    assert!(call.body.get("debit_card_number").is_none());
}
