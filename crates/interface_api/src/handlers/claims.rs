//! Claims handlers
//!
//! Claim ingestion, claim lookup and note upload. These write to the same
//! stores the summarizer reads from.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;
use validator::Validate;

use domain_claims::{Claim, ClaimNote};

use crate::dto::claims::*;
use crate::handlers::{operation_metadata, parse_claim_id};
use crate::{error::ApiError, AppState};

/// Inserts or replaces a batch of claims
pub async fn ingest_claims(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(claims): Json<Vec<Claim>>,
) -> Result<(StatusCode, Json<IngestClaimsResponse>), ApiError> {
    if claims.is_empty() {
        return Err(ApiError::BadRequest("At least one claim is required".to_string()));
    }

    let count = state
        .claims
        .put_claims(claims, Some(operation_metadata(&headers)))
        .await?;

    info!(count, "Claims ingested");
    Ok((StatusCode::CREATED, Json(IngestClaimsResponse { count })))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Claim>, ApiError> {
    let claim_id = parse_claim_id(id)?;
    let claim = state
        .claims
        .get_claim(&claim_id, Some(operation_metadata(&headers)))
        .await?;
    Ok(Json(claim))
}

/// Uploads a note against a claim
pub async fn upload_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UploadNoteRequest>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let claim_id = parse_claim_id(id)?;
    request.validate()?;

    let mut note = ClaimNote::new(claim_id, request.text);
    if let Some(author) = request.author {
        note = note.by(author);
    }
    if let Some(at) = request.recorded_at {
        note = note.recorded_at(at);
    }

    let stored = state
        .notes
        .put_note(note, Some(operation_metadata(&headers)))
        .await?;

    info!(claim_id = %stored.claim_id, note_id = %stored.note_id, "Note uploaded");
    Ok((StatusCode::CREATED, Json(NoteResponse::from(stored))))
}

/// Lists the notes of a claim
pub async fn list_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let claim_id = parse_claim_id(id)?;
    let notes = state
        .notes
        .get_notes(&claim_id, Some(operation_metadata(&headers)))
        .await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}
