//! Retry logic for ledger calls.
//!
//! # Responsibilities
//! - Re-issue a reservation after a transient transport failure
//! - Wait with exponential backoff between attempts
//! - Give up after the configured number of attempts and surface the last error
//!
//! # Design Decisions
//! - Only transport errors are retried; a ledger answer is final, even an error status
//! - The request is resent unchanged so the ledger can de-duplicate on `request_uuid`
//! - No jitter: delays grow strictly from initial to max

use async_trait::async_trait;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::ledger::client::LedgerService;
use crate::ledger::types::{CorrelationHeaders, LedgerResult, ReservationRequest, ReservationResponse};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Bounded retry parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Never below 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        calculate_backoff(
            attempt,
            self.initial_delay.as_millis() as u64,
            self.max_delay.as_millis() as u64,
            self.multiplier,
        )
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.multiplier,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// [`LedgerService`] decorator adding retry with backoff.
pub struct RetryingLedger<L> {
    inner: L,
    policy: RetryPolicy,
}

impl<L: LedgerService> RetryingLedger<L> {
    pub fn new(inner: L, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<L: LedgerService> LedgerService for RetryingLedger<L> {
    async fn reserve(
        &self,
        headers: &CorrelationHeaders,
        request: &ReservationRequest,
    ) -> LedgerResult<ReservationResponse> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.inner.reserve(headers, request).await {
                Ok(response) => {
                    metrics::record_ledger_attempt("ok");
                    return Ok(response);
                }
                Err(e) if e.is_transient() && attempts < max_attempts => {
                    metrics::record_ledger_attempt("transient");
                    metrics::record_ledger_retry();
                    let backoff = self.policy.delay_after(attempts);
                    tracing::info!(
                        request_uuid = %request.request_uuid,
                        account_number = %request.account_number,
                        attempt = attempts,
                        delay = ?backoff,
                        error = %e,
                        "Retrying ledger reservation"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    if e.is_transient() {
                        metrics::record_ledger_attempt("transient");
                        tracing::warn!(
                            request_uuid = %request.request_uuid,
                            attempts,
                            error = %e,
                            "Ledger reservation failed, retries exhausted"
                        );
                    } else {
                        metrics::record_ledger_attempt("error");
                        tracing::debug!(request_uuid = %request.request_uuid, error = %e, "Ledger reservation failed");
                    }
                    return Err(e);
                }
            }
        }
    }
}
