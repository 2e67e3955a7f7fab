//! Reserve-funds orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! ReserveFundsRequest + CorrelationHeaders
//!     → validation.rs (shape checks, no I/O)
//!     → accounts::resolver (canonical account, good standing)
//!     → orchestrator.rs (primary attempt, overdraft cascade)
//!     → ReserveFundsOutcome { status, transactions }
//! ```

pub mod error;
pub mod orchestrator;
pub mod types;
pub mod validation;

pub use error::ReserveFundsError;
pub use orchestrator::ReservationService;
pub use types::{ReserveFundsCommand, ReserveFundsOutcome, ReserveFundsRequest, ReserveFundsStatus};
