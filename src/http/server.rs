//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit, health timeout)
//! - Bind server to listener
//! - Dispatch reservation calls to the orchestrator

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::request::correlation_headers;
use crate::http::response::{ApiError, TimedResponse};
use crate::reservation::{ReservationService, ReserveFundsOutcome, ReserveFundsRequest};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ReservationService,
    pub accepted_version: Arc<str>,
}

/// HTTP server for the reserve-funds API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, service: ReservationService) -> Self {
        let state = AppState {
            service,
            accepted_version: Arc::from(config.service.accepted_version.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No timeout on `/ReserveFunds`: a cascade always runs to completion and each
    /// ledger attempt carries its own deadline.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let health_timeout = TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs));

        Router::new()
            .route("/ReserveFunds", post(reserve_funds_handler))
            .route("/health", get(health_handler).layer(health_timeout))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            accepted_version = %self.config.service.accepted_version,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn reserve_funds_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<TimedResponse<ReserveFundsOutcome>, ApiError> {
    let start = Instant::now();
    let correlation = correlation_headers(&headers, &state.accepted_version)?;

    let request: ReserveFundsRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed request: {}", e)))?;

    tracing::debug!(
        correlation_id = %correlation.correlation_id,
        request_uuid = ?request.request_uuid,
        "ReserveFunds received"
    );

    match state.service.reserve_funds(&correlation, request).await {
        Ok(outcome) => Ok(TimedResponse::since(start, outcome)),
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation.correlation_id,
                error = %e,
                "ReserveFunds failed"
            );
            Err(e.into())
        }
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
