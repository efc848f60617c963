//! PostgreSQL Claim and Note Stores
//!
//! Implements the `ClaimStore` and `NoteStore` ports on top of the
//! repositories in `crate::repositories`.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - connection and pool failures -> `PortError::Connection`
//! - constraint violations -> `PortError::Validation`
//! - rows with unexpected content -> `PortError::Transformation`
//! - other errors -> `PortError::Internal`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresClaimStore, PostgresNoteStore};
//! use domain_claims::{ClaimStore, NoteStore};
//! use std::sync::Arc;
//!
//! let claims: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool.clone()));
//! let notes: Arc<dyn NoteStore> = Arc::new(PostgresNoteStore::new(pool));
//! ```

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ClaimId, DomainPort, HealthCheckResult, HealthCheckable, NoteId, OperationMetadata, PortError,
};
use domain_claims::{Claim, ClaimNote, ClaimStore, NoteStore};

use crate::error::DatabaseError;
use crate::repositories::{ClaimRow, ClaimsRepository, NewClaim, NewNote, NoteRow, NotesRepository};

async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}

/// PostgreSQL-backed implementation of the `ClaimStore` port
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-claim-store").await
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, _metadata), fields(claim_id = %id))]
    async fn get_claim(
        &self,
        id: &ClaimId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Claim, PortError> {
        let row = self.repository.get_by_id(id.as_str()).await?;
        row_to_claim(row)
    }

    #[instrument(skip(self, claims, _metadata), fields(count = claims.len()))]
    async fn put_claims(
        &self,
        claims: Vec<Claim>,
        _metadata: Option<OperationMetadata>,
    ) -> Result<usize, PortError> {
        let rows: Vec<NewClaim> = claims
            .into_iter()
            .map(|claim| NewClaim {
                claim_id: claim.id.into_inner(),
                attributes: Value::Object(claim.attributes),
            })
            .collect();

        Ok(self.repository.upsert_many(&rows).await?)
    }
}

/// PostgreSQL-backed implementation of the `NoteStore` port
#[derive(Debug, Clone)]
pub struct PostgresNoteStore {
    repository: NotesRepository,
    pool: PgPool,
}

impl PostgresNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: NotesRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &NotesRepository {
        &self.repository
    }
}

impl DomainPort for PostgresNoteStore {}

#[async_trait]
impl HealthCheckable for PostgresNoteStore {
    async fn health_check(&self) -> HealthCheckResult {
        ping(&self.pool, "postgres-note-store").await
    }
}

#[async_trait]
impl NoteStore for PostgresNoteStore {
    #[instrument(skip(self, _metadata), fields(claim_id = %claim_id))]
    async fn get_notes(
        &self,
        claim_id: &ClaimId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ClaimNote>, PortError> {
        let rows = self.repository.find_by_claim(claim_id.as_str()).await?;
        debug!(note_count = rows.len(), "Notes loaded");
        rows.into_iter().map(row_to_note).collect()
    }

    #[instrument(skip(self, note, _metadata), fields(claim_id = %note.claim_id))]
    async fn put_note(
        &self,
        note: ClaimNote,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ClaimNote, PortError> {
        if note.text.trim().is_empty() {
            return Err(PortError::validation_field("Note text must not be empty", "text"));
        }

        let row = self
            .repository
            .insert(&NewNote {
                note_id: *note.note_id.as_uuid(),
                claim_id: note.claim_id.as_str().to_string(),
                body: note.text,
                author: note.author,
                recorded_at: note.recorded_at,
            })
            .await?;

        row_to_note(row)
    }
}

/// Converts a claim row to the domain claim
fn row_to_claim(row: ClaimRow) -> Result<Claim, PortError> {
    let id = ClaimId::new(row.claim_id)
        .map_err(|e| PortError::transformation(format!("stored claim id is invalid: {}", e)))?;

    let mut attributes = match row.attributes.0 {
        Value::Object(map) => map,
        other => {
            return Err(DatabaseError::SerializationError(format!(
                "attributes of claim {} are not an object: {}",
                id, other
            ))
            .into())
        }
    };
    attributes.remove("id");

    Ok(Claim { id, attributes })
}

/// Converts a note row to the domain note
fn row_to_note(row: NoteRow) -> Result<ClaimNote, PortError> {
    let claim_id = ClaimId::new(row.claim_id)
        .map_err(|e| PortError::transformation(format!("stored claim id is invalid: {}", e)))?;

    Ok(ClaimNote {
        note_id: NoteId::from_uuid(row.note_id),
        claim_id,
        text: row.body,
        author: row.author,
        recorded_at: row.recorded_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn claim_row(attributes: Value) -> ClaimRow {
        ClaimRow {
            claim_id: "C1".to_string(),
            attributes: Json(attributes),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_claim() {
        let claim = row_to_claim(claim_row(json!({ "status": "open", "id": "stale" }))).unwrap();
        assert_eq!(claim.id.as_str(), "C1");
        assert_eq!(claim.attribute("status").unwrap(), "open");
        assert!(claim.attribute("id").is_none());
    }

    #[test]
    fn test_non_object_attributes_are_rejected() {
        let error = row_to_claim(claim_row(json!([1, 2]))).unwrap_err();
        assert!(matches!(error, PortError::Transformation { .. }));
    }

    #[test]
    fn test_row_to_note() {
        let note_id = Uuid::now_v7();
        let note = row_to_note(NoteRow {
            note_id,
            claim_id: "C1".to_string(),
            body: "fender bent".to_string(),
            author: Some("adjuster-7".to_string()),
            recorded_at: None,
            created_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(note.note_id.as_uuid(), &note_id);
        assert_eq!(note.text, "fender bent");
        assert_eq!(note.author.as_deref(), Some("adjuster-7"));
    }
}
