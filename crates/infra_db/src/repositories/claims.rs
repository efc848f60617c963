//! Claims repository implementation
//!
//! Database access for claim records. A claim is a text id plus a JSONB
//! object of attributes that the service never interprets.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;

/// Repository for claim records
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, claim_id: &str) -> Result<ClaimRow, DatabaseError> {
        sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT claim_id, attributes, created_at, updated_at
            FROM claims
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Inserts or replaces a batch of claims in one transaction
    ///
    /// # Returns
    ///
    /// The number of claims written
    pub async fn upsert_many(&self, claims: &[NewClaim]) -> Result<usize, DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        for claim in claims {
            sqlx::query(
                r#"
                INSERT INTO claims (claim_id, attributes)
                VALUES ($1, $2)
                ON CONFLICT (claim_id)
                DO UPDATE SET attributes = EXCLUDED.attributes, updated_at = now()
                "#,
            )
            .bind(&claim.claim_id)
            .bind(Json(&claim.attributes))
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        debug!(count = claims.len(), "Claims upserted");
        Ok(claims.len())
    }
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: String,
    pub attributes: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for writing a claim
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub claim_id: String,
    pub attributes: Value,
}
