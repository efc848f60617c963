//! Summary handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use domain_claims::ClaimSummary;

use crate::handlers::{operation_metadata, parse_claim_id};
use crate::{error::ApiError, AppState};

/// Summarizes a claim and its notes
///
/// Each call goes to the model; nothing is cached. Failures keep their
/// summarization error kind in the `error` field of the body.
pub async fn summarize_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ClaimSummary>, ApiError> {
    let claim_id = parse_claim_id(id)?;
    let summary = state
        .summarizer
        .summarize(&claim_id, Some(operation_metadata(&headers)))
        .await?;
    Ok(Json(summary))
}
