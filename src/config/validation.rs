//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::new("listener.max_body_size", "must be > 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if let Err(e) = config.ledger.url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "ledger.url",
            format!("'{}' is not a valid URL: {}", config.ledger.url, e),
        ));
    }
    if config.ledger.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("ledger.connect_timeout_ms", "must be > 0"));
    }
    if config.ledger.request_timeout_ms == 0 {
        errors.push(ValidationError::new("ledger.request_timeout_ms", "must be > 0"));
    }

    let retries = &config.retries;
    if retries.max_attempts < 1 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }
    if retries.initial_delay_ms > retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.initial_delay_ms",
            format!(
                "{} exceeds retries.max_delay_ms {}",
                retries.initial_delay_ms, retries.max_delay_ms
            ),
        ));
    }
    if !(retries.multiplier >= 1.0) {
        errors.push(ValidationError::new("retries.multiplier", "must be >= 1.0"));
    }

    if config.service.ait_id.trim().is_empty() {
        errors.push(ValidationError::new("service.ait_id", "must not be empty"));
    }
    if config.service.accepted_version.trim().is_empty() {
        errors.push(ValidationError::new("service.accepted_version", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
