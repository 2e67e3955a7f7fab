//! Ledger RPC client with timeout and error classification.
//!
//! # Responsibilities
//! - POST reservation requests to the ledger service
//! - Forward correlation headers from the inbound request
//! - Classify failures: transport (retryable) vs application (returned as-is)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::error::Error as _;
use std::time::{Duration, Instant};

use crate::config::LedgerConfig;
use crate::http::response::TimedResponse;
use crate::ledger::types::{
    CorrelationHeaders, LedgerError, LedgerResult, ReservationRequest, ReservationResponse,
    TransportFailure, AIT_ID, BUSINESS_TAXONOMY_ID, CORRELATION_ID,
};

/// The remote "reserve funds" operation.
#[async_trait]
pub trait LedgerService: Send + Sync {
    async fn reserve(
        &self,
        headers: &CorrelationHeaders,
        request: &ReservationRequest,
    ) -> LedgerResult<ReservationResponse>;
}

/// Ledger client speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpLedgerClient {
    client: reqwest::Client,
    url: url::Url,
    /// Our own application id, sent as `ait-id`.
    ait_id: String,
    config: LedgerConfig,
}

impl HttpLedgerClient {
    /// Create a client for the configured ledger endpoint.
    ///
    /// Connect and request timeouts apply to every attempt separately.
    pub fn new(config: LedgerConfig, ait_id: impl Into<String>) -> LedgerResult<Self> {
        let url: url::Url = config
            .url
            .parse()
            .map_err(|e| LedgerError::Request(format!("Invalid ledger URL '{}': {}", config.url, e)))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|e| LedgerError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url,
            ait_id: ait_id.into(),
            config,
        })
    }

    fn build_headers(&self, calling: &CorrelationHeaders) -> LedgerResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in [
            (AIT_ID, &self.ait_id),
            (BUSINESS_TAXONOMY_ID, &calling.business_taxonomy_id),
            (CORRELATION_ID, &calling.correlation_id),
        ] {
            let value = HeaderValue::from_str(value)
                .map_err(|e| LedgerError::Request(format!("header {}: {}", name, e)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl LedgerService for HttpLedgerClient {
    async fn reserve(
        &self,
        headers: &CorrelationHeaders,
        request: &ReservationRequest,
    ) -> LedgerResult<ReservationResponse> {
        let start = Instant::now();
        let response = self
            .client
            .post(self.url.clone())
            .headers(self.build_headers(headers)?)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                account_number = %request.account_number,
                "Ledger returned error status"
            );
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(classify)?;
        let envelope: TimedResponse<ReservationResponse> = serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::Malformed(e.to_string()))?;

        tracing::debug!(
            account_number = %request.account_number,
            status = ?envelope.payload.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            remote_elapsed_ms = envelope.service_time_elapsed,
            "Ledger reservation completed"
        );
        Ok(envelope.payload)
    }
}

impl std::fmt::Debug for HttpLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLedgerClient")
            .field("url", &self.config.url)
            .field("connect_timeout_ms", &self.config.connect_timeout_ms)
            .field("request_timeout_ms", &self.config.request_timeout_ms)
            .finish()
    }
}

/// Map a reqwest failure onto the ledger error taxonomy.
fn classify(err: reqwest::Error) -> LedgerError {
    let message = describe(&err);
    if err.is_timeout() {
        LedgerError::transport(TransportFailure::Timeout, message)
    } else if err.is_connect() {
        LedgerError::transport(TransportFailure::Connect, message)
    } else if err.is_builder() {
        LedgerError::Request(message)
    } else if err.is_decode() {
        LedgerError::Malformed(message)
    } else if err.is_redirect() {
        LedgerError::Request(message)
    } else if err.is_request() || err.is_body() {
        // Connection dropped mid-exchange (reset, closed before response, broken body).
        LedgerError::transport(TransportFailure::Reset, message)
    } else {
        LedgerError::Request(message)
    }
}

/// Error message including the innermost cause, which reqwest hides by default.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = format!("{}: {}", message, cause);
        source = cause.source();
    }
    message
}
