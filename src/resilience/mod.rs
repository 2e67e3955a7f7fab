//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Reservation attempt against the ledger:
//!     → ledger client (enforce connect/request timeout per attempt)
//!     → On transport failure: retries.rs (retry with backoff.rs delays)
//!     → Budget exhausted: error surfaces unchanged to the orchestrator
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every ledger call has a deadline
//! - Retries only for transport failures; the ledger de-duplicates by request uuid
//! - All resilience logic wraps the `LedgerService` trait, independent of the cascade

pub mod backoff;
pub mod retries;

pub use retries::{RetryPolicy, RetryingLedger};
