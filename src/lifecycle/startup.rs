//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the account store from the configured seed
//! - Wrap the ledger client in the retry policy
//! - Assemble the reservation service
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::accounts::InMemoryAccountStore;
use crate::config::ServiceConfig;
use crate::ledger::{HttpLedgerClient, LedgerError};
use crate::reservation::ReservationService;
use crate::resilience::{RetryPolicy, RetryingLedger};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load account seed '{path}': {source}")]
    Seed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create ledger client: {0}")]
    Ledger(#[from] LedgerError),
}

/// Load the account store. Empty when no seed is configured.
pub fn build_account_store(config: &ServiceConfig) -> Result<InMemoryAccountStore, StartupError> {
    match &config.accounts.seed_path {
        Some(path) => {
            let store = InMemoryAccountStore::load_from_file(Path::new(path)).map_err(|source| {
                StartupError::Seed {
                    path: path.clone(),
                    source,
                }
            })?;
            tracing::info!(seed_path = %path, "Account store loaded");
            Ok(store)
        }
        None => {
            tracing::warn!("No account seed configured, starting with an empty store");
            Ok(InMemoryAccountStore::new())
        }
    }
}

/// Wire the store and the retrying ledger client into a [`ReservationService`].
pub fn build_service(config: &ServiceConfig) -> Result<ReservationService, StartupError> {
    let store = build_account_store(config)?;

    let client = HttpLedgerClient::new(config.ledger.clone(), config.service.ait_id.clone())?;
    let ledger = RetryingLedger::new(client, RetryPolicy::from(&config.retries));
    tracing::info!(
        ledger_url = %config.ledger.url,
        max_attempts = ledger.policy().max_attempts,
        initial_delay = ?ledger.policy().initial_delay,
        max_delay = ?ledger.policy().max_delay,
        "Ledger client ready"
    );

    Ok(ReservationService::new(Arc::new(store), Arc::new(ledger)))
}
