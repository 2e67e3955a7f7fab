//! Inbound header extraction.
//!
//! # Responsibilities
//! - Require the correlation headers on every reservation call
//! - Enforce the API version the service speaks
//!
//! # Design Decisions
//! - Checked before the body is looked at; a bad envelope never reaches the orchestrator
//! - The first missing header is reported by name

use axum::http::HeaderMap;

use crate::http::response::ApiError;
use crate::ledger::types::{
    CorrelationHeaders, ACCEPT_VERSION, AIT_ID, BUSINESS_TAXONOMY_ID, CORRELATION_ID,
};

fn required<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Missing header variable {}", name)))
}

/// Pull [`CorrelationHeaders`] out of a request, checking `accept-version`.
pub fn correlation_headers(
    headers: &HeaderMap,
    accepted_version: &str,
) -> Result<CorrelationHeaders, ApiError> {
    let ait_id = required(headers, AIT_ID)?;
    let business_taxonomy_id = required(headers, BUSINESS_TAXONOMY_ID)?;
    let correlation_id = required(headers, CORRELATION_ID)?;
    let version = required(headers, ACCEPT_VERSION)?;

    if version != accepted_version {
        return Err(ApiError::bad_request(format!(
            "Unsupported {} '{}', expected '{}'",
            ACCEPT_VERSION, version, accepted_version
        )));
    }

    Ok(CorrelationHeaders {
        ait_id: ait_id.to_string(),
        business_taxonomy_id: business_taxonomy_id.to_string(),
        correlation_id: correlation_id.to_string(),
    })
}
