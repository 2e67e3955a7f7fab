//! Typed client for the reserve-funds HTTP API.

pub mod client;

pub use client::{
    CallerHeaders, ReserveFundsClient, ReserveFundsOutcome, ReserveFundsRequest, SdkError,
    TimedResponse, Transaction,
};
