//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::NoteId;
use domain_claims::ClaimNote;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Body of a note upload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadNoteRequest {
    #[validate(length(max = 20000), custom(function = "not_blank"))]
    pub text: String,
    #[validate(length(min = 1, max = 200))]
    pub author: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// A stored note
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub note_id: NoteId,
    pub claim_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl From<ClaimNote> for NoteResponse {
    fn from(note: ClaimNote) -> Self {
        Self {
            note_id: note.note_id,
            claim_id: note.claim_id.into_inner(),
            text: note.text,
            author: note.author,
            recorded_at: note.recorded_at,
        }
    }
}

/// Outcome of a claim batch ingest
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestClaimsResponse {
    pub count: usize,
}
