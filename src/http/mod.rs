//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (required headers, accept-version)
//!     → reservation::ReservationService
//!     → response.rs (TimedResponse envelope, error → status code)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use response::{ApiError, TimedResponse};
pub use server::HttpServer;
