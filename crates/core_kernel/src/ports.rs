//! Ports and Adapters Infrastructure
//!
//! The summarization core talks to three external collaborators: the claim
//! store, the note store, and the generative-text backend. Each one is a port
//! trait defined in `domain_claims`; this module holds the pieces every port
//! shares.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                SummarizationOrchestrator                  │
//! └──────────────────────────────────────────────────────────┘
//!          │                  │                    │
//!          ▼                  ▼                    ▼
//!   ┌────────────┐     ┌────────────┐     ┌──────────────────────┐
//!   │ ClaimStore │     │ NoteStore  │     │ GenerativeTextBackend│
//!   └────────────┘     └────────────┘     └──────────────────────┘
//!     ▲        ▲         ▲        ▲                 ▲
//!  memory  postgres   memory  postgres        HTTP (chat API)
//! ```
//!
//! Adapters report failures as `PortError` so that callers can tell a missing
//! entity apart from an unreachable dependency without knowing which adapter
//! produced the error.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::TraceId;

/// Error type for port operations
///
/// Every adapter maps its native failures (sqlx errors, HTTP status codes,
/// transport errors) onto these variants.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The request was rejected because of invalid input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The external system refused our credentials
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded for external API
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The external system answered with a payload we could not interpret
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Connection error that keeps the underlying cause
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PortError::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a Timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        PortError::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Creates a ServiceUnavailable error
    pub fn unavailable(service: impl Into<String>) -> Self {
        PortError::ServiceUnavailable {
            service: service.into(),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if the operation exceeded its time budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, PortError::Timeout { .. })
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across concurrent requests behind `Arc`, so every
/// implementation must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

/// Kind of adapter behind a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    /// Process-local, in-memory adapter
    InMemory,
    /// PostgreSQL-backed adapter
    Postgres,
    /// External REST API adapter
    ExternalRestApi,
    /// Mock adapter for testing
    Mock,
}

impl fmt::Display for AdapterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterType::InMemory => "in_memory",
            AdapterType::Postgres => "postgres",
            AdapterType::ExternalRestApi => "external_rest_api",
            AdapterType::Mock => "mock",
        };
        f.write_str(name)
    }
}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    /// A healthy result with no message
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: Utc::now(),
        }
    }

    /// An unhealthy result explaining what went wrong
    pub fn unhealthy(
        adapter_id: impl Into<String>,
        latency_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: Utc::now(),
        }
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    ///
    /// # Returns
    ///
    /// A `HealthCheckResult` indicating the current health status
    async fn health_check(&self) -> HealthCheckResult;
}

/// Metadata about a port operation for auditing and tracing
///
/// The correlation id is the trace context of the request: it is set from the
/// inbound `x-request-id` header and forwarded to every port call.
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Correlation ID for tracing across systems
    pub correlation_id: Option<String>,
    /// Source system identifier
    pub source_system: Option<String>,
    /// Additional context as key-value pairs
    pub context: HashMap<String, String>,
}

impl OperationMetadata {
    /// Creates new metadata with a correlation ID
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Default::default()
        }
    }

    /// Adds context to the metadata
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Returns the correlation id, minting a fresh trace id when none was supplied
    pub fn ensure_correlation_id(&mut self) -> &str {
        self.correlation_id
            .get_or_insert_with(|| TraceId::new().to_string())
            .as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Claim", "C1");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Claim"));
        assert!(error.to_string().contains("C1"));
    }

    #[test]
    fn test_port_error_transient() {
        assert!(PortError::timeout("get_claim", 5000).is_transient());
        assert!(PortError::RateLimited { retry_after_secs: 60 }.is_transient());
        assert!(PortError::connection("refused").is_transient());
        assert!(!PortError::validation("bad id").is_transient());
        assert!(!PortError::transformation("no content").is_transient());
    }

    #[test]
    fn test_operation_metadata() {
        let metadata = OperationMetadata::with_correlation_id("req-123")
            .with_context("route", "summary");

        assert_eq!(metadata.correlation_id, Some("req-123".to_string()));
        assert_eq!(metadata.context.get("route"), Some(&"summary".to_string()));
    }

    #[test]
    fn test_ensure_correlation_id_keeps_existing() {
        let mut metadata = OperationMetadata::with_correlation_id("req-1");
        assert_eq!(metadata.ensure_correlation_id(), "req-1");
    }

    #[test]
    fn test_ensure_correlation_id_mints_trace_id() {
        let mut metadata = OperationMetadata::default();
        let id = metadata.ensure_correlation_id().to_string();
        assert!(id.starts_with("TRC-"));
        assert_eq!(metadata.correlation_id, Some(id));
    }
}
