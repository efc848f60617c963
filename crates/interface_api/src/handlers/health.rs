//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::RegistryHealthReport;
use domain_claims::SummaryMetrics;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    #[serde(flatten)]
    pub report: RegistryHealthReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<SummaryMetrics>,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness check (includes stores, the model endpoint and summary counters)
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let report = state.health.check_all().await;

    let (status, label) = if report.is_operational() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status,
        Json(ReadinessResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            report,
            summaries: state.summarizer.summary_metrics(),
        }),
    )
}
