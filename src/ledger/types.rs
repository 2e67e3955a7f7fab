//! Ledger wire types and error definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Header carrying the calling application's id.
pub const AIT_ID: &str = "ait-id";
/// Header carrying the business taxonomy id.
pub const BUSINESS_TAXONOMY_ID: &str = "business-taxonomy-id";
/// Header carrying the end-to-end correlation id.
pub const CORRELATION_ID: &str = "correlation-id";
/// Header carrying the API version the caller speaks.
pub const ACCEPT_VERSION: &str = "accept-version";

/// Tracing headers received from the caller and forwarded to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorrelationHeaders {
    pub ait_id: String,
    pub business_taxonomy_id: String,
    pub correlation_id: String,
}

/// A single reservation against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_card_number: Option<String>,
    /// Idempotency key, shared by every attempt of one cascade.
    pub request_uuid: Uuid,
    pub transaction_amount: i64,
    pub transaction_meta_data_json: String,
    pub protect_against_overdraft: bool,
}

/// Outcome reported by the ledger for one reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Success,
    InsufficientFunds,
}

/// The transaction the ledger recorded for an attempt, accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResource {
    pub transaction_uuid: Uuid,
    pub request_uuid: Uuid,
    #[serde(default)]
    pub reservation_uuid: Option<Uuid>,
    pub account_number: String,
    #[serde(default)]
    pub debit_card_number: Option<String>,
    pub transaction_amount: i64,
    #[serde(default)]
    pub running_balance_amount: i64,
    #[serde(default)]
    pub transaction_meta_data_json: String,
    pub transaction_type_code: String,
    pub insert_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub status: ReservationStatus,
    pub resource: TransactionResource,
}

/// Kind of network failure seen while calling the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Timeout,
    Reset,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::Connect => f.write_str("connection failed"),
            TransportFailure::Timeout => f.write_str("timed out"),
            TransportFailure::Reset => f.write_str("connection reset"),
        }
    }
}

/// Errors that can occur while calling the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Network-level failure. The only retryable kind.
    #[error("Ledger transport error ({kind}): {message}")]
    Transport {
        kind: TransportFailure,
        message: String,
    },

    /// The ledger answered with a non-success HTTP status.
    #[error("Ledger rejected reservation with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The ledger answered but the payload could not be decoded.
    #[error("Malformed ledger response: {0}")]
    Malformed(String),

    /// The request could not be built.
    #[error("Invalid ledger request: {0}")]
    Request(String),
}

impl LedgerError {
    pub fn transport(kind: TransportFailure, message: impl Into<String>) -> Self {
        LedgerError::Transport {
            kind,
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Transport { .. })
    }
}

/// Result type for ledger calls.
pub type LedgerResult<T> = Result<T, LedgerError>;
