//! Claims Summary API - Server Binary
//!
//! This binary starts the HTTP API server of the claims summary service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (in-memory stores)
//! cargo run --bin claims-summary-api
//!
//! # Run against PostgreSQL and a local OpenAI-compatible endpoint
//! API_STORE_BACKEND=postgres API_DATABASE_URL=postgres://... \
//!   API_LLM_BASE_URL=http://localhost:11434/v1 cargo run --bin claims-summary-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log filter: trace, debug, info, warn, error (default: info)
//! * `API_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! * `API_REQUEST_TIMEOUT_SECS` - Deadline of a whole request (default: 120)
//! * `API_STORE_BACKEND` - `memory` or `postgres` (default: memory)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_LLM_BASE_URL` - Model endpoint (default: https://api.openai.com/v1)
//! * `API_LLM_API_KEY` - Bearer token for the model endpoint
//! * `API_LLM_MODEL` - Model identifier (default: gpt-4o-mini)
//! * `API_LLM_MAX_OUTPUT_TOKENS` - Generated token bound (default: 8000)
//! * `API_LLM_TEMPERATURE` - Sampling temperature (default: 0.5)
//! * `API_LLM_TIMEOUT_SECS` - Bounded wait for one model call (default: 60)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{
    bootstrap::Services,
    config::{ApiConfig, LogFormat},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, builds the stores and the model
/// client, and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or is inconsistent
/// - The configured database cannot be reached
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level, config.log_format);

    config.validate()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        store_backend = ?config.store_backend,
        "Starting Claims Summary API Server"
    );

    let services = Services::start(&config).await?;
    let app = create_router(services.app_state());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    services.shutdown().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests are allowed to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
