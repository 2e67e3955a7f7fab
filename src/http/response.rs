//! Response envelope and error mapping.
//!
//! # Responsibilities
//! - Wrap every payload with the time spent serving it
//! - Map reservation failures to HTTP status codes
//!
//! # Design Decisions
//! - Error bodies are `{"error": "<message>"}` so callers never parse free text
//! - Transport failures after retries are our fault (500); bad ledger answers are upstream faults (502)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::accounts::store::StoreError;
use crate::ledger::types::LedgerError;
use crate::reservation::error::ReserveFundsError;

/// Payload plus elapsed service time in milliseconds.
///
/// Both this service and the ledger answer in this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedResponse<T> {
    pub service_time_elapsed: u64,
    pub payload: T,
}

impl<T> TimedResponse<T> {
    /// Stamp `payload` with the time elapsed since `start`.
    pub fn since(start: Instant, payload: T) -> Self {
        Self {
            service_time_elapsed: start.elapsed().as_millis() as u64,
            payload,
        }
    }
}

impl<T: Serialize> IntoResponse for TimedResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// HTTP-facing error.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ReserveFundsError> for ApiError {
    fn from(err: ReserveFundsError) -> Self {
        let status = match &err {
            ReserveFundsError::Validation(_) => StatusCode::BAD_REQUEST,
            ReserveFundsError::UnprocessableState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReserveFundsError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ReserveFundsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReserveFundsError::Ledger(LedgerError::Rejected { .. })
            | ReserveFundsError::Ledger(LedgerError::Malformed(_)) => StatusCode::BAD_GATEWAY,
            ReserveFundsError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
