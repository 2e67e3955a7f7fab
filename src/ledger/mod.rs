//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator builds ReservationRequest
//!     → resilience::retries::RetryingLedger (bounded retry on transport errors)
//!     → client.rs HttpLedgerClient (POST JSON, per-attempt timeouts)
//!     → ReservationResponse { SUCCESS | INSUFFICIENT_FUNDS, TransactionResource }
//! ```
//!
//! # Constraints
//! - The ledger decides whether funds are available; this side only asks
//! - `request_uuid` is the ledger's idempotency key and must not change between retries
//! - Error statuses from the ledger are application results, never retried

pub mod client;
pub mod types;

pub use client::{HttpLedgerClient, LedgerService};
pub use types::{
    CorrelationHeaders, LedgerError, ReservationRequest, ReservationResponse, ReservationStatus,
    TransactionResource, TransportFailure,
};
