//! Claim notes repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for free-text claim notes
#[derive(Debug, Clone)]
pub struct NotesRepository {
    pool: PgPool,
}

impl NotesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves every note of a claim, oldest first
    ///
    /// Undated notes sort after dated ones, in upload order.
    pub async fn find_by_claim(&self, claim_id: &str) -> Result<Vec<NoteRow>, DatabaseError> {
        let notes = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT note_id, claim_id, body, author, recorded_at, created_at
            FROM claim_notes
            WHERE claim_id = $1
            ORDER BY recorded_at ASC NULLS LAST, created_at ASC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(notes)
    }

    /// Inserts a note
    pub async fn insert(&self, note: &NewNote) -> Result<NoteRow, DatabaseError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO claim_notes (note_id, claim_id, body, author, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING note_id, claim_id, body, author, recorded_at, created_at
            "#,
        )
        .bind(note.note_id)
        .bind(&note.claim_id)
        .bind(&note.body)
        .bind(&note.author)
        .bind(note.recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(row)
    }
}

/// Database row for a claim note
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    pub note_id: Uuid,
    pub claim_id: String,
    pub body: String,
    pub author: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a note
#[derive(Debug, Clone)]
pub struct NewNote {
    pub note_id: Uuid,
    pub claim_id: String,
    pub body: String,
    pub author: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}
