//! HTTP API Layer
//!
//! This crate provides the REST API of the claims summary service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for summaries, claims, notes and health
//! - **Middleware**: Request ids, tracing, request logging, timeouts
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//! - **Bootstrap**: Builds the stores, the model client and the summarizer
//!   from configuration
//!
//! # Routes
//!
//! | Method | Path                           | Purpose                   |
//! |--------|--------------------------------|---------------------------|
//! | GET    | `/health`                      | Liveness                  |
//! | GET    | `/health/ready`                | Dependency health         |
//! | POST   | `/api/v1/claims`               | Batch claim ingest        |
//! | GET    | `/api/v1/claims/:id`           | Claim lookup              |
//! | GET    | `/api/v1/claims/:id/notes`     | Notes of a claim          |
//! | POST   | `/api/v1/claims/:id/notes`     | Note upload               |
//! | GET    | `/api/v1/claims/:id/summary`   | Four-part claim summary   |
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{bootstrap::Services, create_router};
//!
//! let services = Services::start(&config).await?;
//! let app = create_router(services.app_state());
//! axum::serve(listener, app).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::Request,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthRegistry;
use domain_claims::{ClaimStore, ClaimSummarizer, NoteStore};

use crate::config::ApiConfig;
use crate::handlers::{claims, health, summary};
use crate::middleware::{handle_deadline_error, request_id, request_log_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<dyn ClaimSummarizer>,
    pub claims: Arc<dyn ClaimStore>,
    pub notes: Arc<dyn NoteStore>,
    pub health: Arc<HealthRegistry>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Summarizer, stores and health registry shared by all handlers
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout();

    // Public routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/", post(claims::ingest_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/notes", get(claims::list_notes).post(claims::upload_note))
        .route("/:id/summary", get(summary::summarize_claim));

    // Combine all routes
    Router::new()
        .merge(health_routes)
        .nest("/api/v1/claims", claims_routes)
        // An elapsed request deadline answers 504, like engine timeouts
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_deadline_error))
                .timeout(request_timeout),
        )
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request_id(request.headers()).unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
