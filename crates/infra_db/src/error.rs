//! Database error types
//!
//! This module defines the error types that can occur during database operations,
//! and how they are reported to the domain through `PortError`.

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value does not have the expected shape
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("Claim", "C1");
    /// assert!(error.to_string().contains("Claim"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseError::NotFound { .. } | DatabaseError::SqlError(sqlx::Error::RowNotFound)
        )
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_) | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        match self {
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => true,
            DatabaseError::SqlError(e) => is_connection_failure(e),
            _ => false,
        }
    }
}

fn is_connection_failure(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// The PostgreSQL error code decides the variant for database-side errors.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23514") | Some("23502") => {
                        DatabaseError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            e if is_connection_failure(e) => DatabaseError::ConnectionFailed(e.to_string()),
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Reports database failures to the domain
///
/// Connection-level failures become `PortError::Connection` so callers can
/// tell an unreachable store apart from a bad query.
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, id } => PortError::NotFound {
                entity_type: entity,
                id,
            },
            e if e.is_connection_error() => {
                let message = e.to_string();
                PortError::connection_with_source(message, e)
            }
            e if e.is_constraint_violation() => PortError::validation(e.to_string()),
            DatabaseError::SerializationError(message) => PortError::transformation(message),
            e => PortError::Internal {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port: PortError = DatabaseError::not_found("Claim", "C1").into();
        assert!(port.is_not_found());
        assert!(port.to_string().contains("C1"));
    }

    #[test]
    fn test_pool_timeout_is_connection_failure() {
        let error = DatabaseError::from(&sqlx::Error::PoolTimedOut);
        assert!(error.is_connection_error());

        let port: PortError = error.into();
        assert!(matches!(port, PortError::Connection { .. }));
        assert!(port.is_transient());
    }

    #[test]
    fn test_wrapped_pool_closed_is_connection_failure() {
        let port: PortError = DatabaseError::SqlError(sqlx::Error::PoolClosed).into();
        assert!(matches!(port, PortError::Connection { .. }));
    }

    #[test]
    fn test_duplicate_is_validation() {
        let port: PortError = DatabaseError::DuplicateEntry("claim_id".into()).into();
        assert!(matches!(port, PortError::Validation { .. }));
    }

    #[test]
    fn test_bad_stored_value_is_transformation() {
        let port: PortError = DatabaseError::SerializationError("not an object".into()).into();
        assert!(matches!(port, PortError::Transformation { .. }));
    }
}
