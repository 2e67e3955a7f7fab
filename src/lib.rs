//! Funds reservation service with overdraft protection.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────────┐
//!                    │                   RESERVE FUNDS                           │
//!                    │                                                           │
//!   POST /ReserveFunds  ┌─────────┐    ┌─────────────┐    ┌────────────────┐     │
//!   ─────────────────┼─▶│  http   │───▶│ reservation │───▶│   accounts     │     │
//!                    │  │ server  │    │ orchestrator│    │ resolver/store │     │
//!                    │  └─────────┘    └──────┬──────┘    └────────────────┘     │
//!                    │                        │                                  │
//!                    │                        ▼                                  │
//!                    │                 ┌─────────────┐    ┌────────────────┐     │
//!                    │                 │ resilience  │───▶│    ledger      │─────┼──▶ Ledger
//!                    │                 │  retries    │    │  http client   │     │    Service
//!                    │                 └─────────────┘    └────────────────┘     │
//!                    │                                                           │
//!                    │  ┌────────────────────────────────────────────────────┐   │
//!                    │  │   config   │   observability   │   lifecycle       │   │
//!                    │  └────────────────────────────────────────────────────┘   │
//!                    └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A reservation is tried on the primary account first. When the ledger reports
//! insufficient funds and the caller asked for protection, the account's overdraft
//! instructions are tried in sequence order until one succeeds.

// Domain
pub mod accounts;
pub mod ledger;
pub mod reservation;

// Surfaces
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use reservation::ReservationService;
