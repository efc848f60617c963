//! Claims domain errors
//!
//! `SummarizationError` is what callers of `summarize` see. Every variant
//! carries the claim id, and dependency failures keep the port error that
//! caused them, so a failure can be diagnosed without re-running the call.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use core_kernel::{ClaimId, PortError};

use crate::engine::EngineError;
use crate::parser::ParseError;
use crate::summary::SummaryField;

/// The store a failed lookup went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    ClaimStore,
    NoteStore,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::ClaimStore => f.write_str("claim store"),
            StoreKind::NoteStore => f.write_str("note store"),
        }
    }
}

/// Flat classification of a summarization failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ClaimNotFound,
    DependencyUnavailable,
    EngineUnavailable,
    EngineTimeout,
    MalformedOutput,
    IncompleteOutput,
}

impl ErrorKind {
    /// Stable snake_case name, used in logs and error bodies
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ClaimNotFound => "claim_not_found",
            ErrorKind::DependencyUnavailable => "dependency_unavailable",
            ErrorKind::EngineUnavailable => "engine_unavailable",
            ErrorKind::EngineTimeout => "engine_timeout",
            ErrorKind::MalformedOutput => "malformed_output",
            ErrorKind::IncompleteOutput => "incomplete_output",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the summarization pipeline
#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("Claim not found: {claim_id}")]
    ClaimNotFound { claim_id: ClaimId },

    #[error("Dependency unavailable: {store} failed for claim {claim_id}: {source}")]
    DependencyUnavailable {
        store: StoreKind,
        claim_id: ClaimId,
        #[source]
        source: PortError,
    },

    #[error("Summarization engine unavailable for claim {claim_id}: {message}")]
    EngineUnavailable {
        claim_id: ClaimId,
        message: String,
        #[source]
        source: Option<PortError>,
    },

    #[error("Summarization engine timed out after {timeout_ms}ms for claim {claim_id}")]
    EngineTimeout { claim_id: ClaimId, timeout_ms: u64 },

    #[error("Malformed model output for claim {claim_id}: {reason}")]
    MalformedOutput { claim_id: ClaimId, reason: String },

    #[error("Incomplete model output for claim {claim_id}: missing or empty {}", join_fields(.missing))]
    IncompleteOutput {
        claim_id: ClaimId,
        missing: Vec<SummaryField>,
    },
}

fn join_fields(fields: &[SummaryField]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SummarizationError {
    /// Classifies a claim store failure
    ///
    /// `NotFound` becomes `ClaimNotFound`; anything else means the store could
    /// not answer.
    pub fn from_claim_store(claim_id: &ClaimId, error: PortError) -> Self {
        if error.is_not_found() {
            SummarizationError::ClaimNotFound {
                claim_id: claim_id.clone(),
            }
        } else {
            SummarizationError::DependencyUnavailable {
                store: StoreKind::ClaimStore,
                claim_id: claim_id.clone(),
                source: error,
            }
        }
    }

    /// Classifies a note store failure
    pub fn from_note_store(claim_id: &ClaimId, error: PortError) -> Self {
        SummarizationError::DependencyUnavailable {
            store: StoreKind::NoteStore,
            claim_id: claim_id.clone(),
            source: error,
        }
    }

    /// Attaches the claim id to an engine failure
    pub fn from_engine(claim_id: &ClaimId, error: EngineError) -> Self {
        match error {
            EngineError::Unavailable { message, source } => SummarizationError::EngineUnavailable {
                claim_id: claim_id.clone(),
                message,
                source,
            },
            EngineError::Timeout { timeout_ms } => SummarizationError::EngineTimeout {
                claim_id: claim_id.clone(),
                timeout_ms,
            },
        }
    }

    /// Attaches the claim id to a parse failure
    pub fn from_parse(claim_id: &ClaimId, error: ParseError) -> Self {
        match error {
            ParseError::Malformed { reason } => SummarizationError::MalformedOutput {
                claim_id: claim_id.clone(),
                reason,
            },
            ParseError::Incomplete { missing } => SummarizationError::IncompleteOutput {
                claim_id: claim_id.clone(),
                missing,
            },
        }
    }

    /// The flat error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummarizationError::ClaimNotFound { .. } => ErrorKind::ClaimNotFound,
            SummarizationError::DependencyUnavailable { .. } => ErrorKind::DependencyUnavailable,
            SummarizationError::EngineUnavailable { .. } => ErrorKind::EngineUnavailable,
            SummarizationError::EngineTimeout { .. } => ErrorKind::EngineTimeout,
            SummarizationError::MalformedOutput { .. } => ErrorKind::MalformedOutput,
            SummarizationError::IncompleteOutput { .. } => ErrorKind::IncompleteOutput,
        }
    }

    /// The claim the failed call was about
    pub fn claim_id(&self) -> &ClaimId {
        match self {
            SummarizationError::ClaimNotFound { claim_id }
            | SummarizationError::DependencyUnavailable { claim_id, .. }
            | SummarizationError::EngineUnavailable { claim_id, .. }
            | SummarizationError::EngineTimeout { claim_id, .. }
            | SummarizationError::MalformedOutput { claim_id, .. }
            | SummarizationError::IncompleteOutput { claim_id, .. } => claim_id,
        }
    }

    /// Whether the caller may reasonably try again later
    ///
    /// Store and engine failures are retryable by the caller; a missing claim
    /// or a contract violation by the model is reported as final for this
    /// attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DependencyUnavailable | ErrorKind::EngineUnavailable | ErrorKind::EngineTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c1() -> ClaimId {
        ClaimId::new("C1").unwrap()
    }

    #[test]
    fn test_not_found_maps_to_claim_not_found() {
        let error = SummarizationError::from_claim_store(&c1(), PortError::not_found("Claim", "C1"));
        assert_eq!(error.kind(), ErrorKind::ClaimNotFound);
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_claim_store_outage_is_dependency_failure() {
        let error = SummarizationError::from_claim_store(&c1(), PortError::connection("refused"));
        assert_eq!(error.kind(), ErrorKind::DependencyUnavailable);
        assert!(error.is_retryable());
        assert!(error.to_string().contains("claim store"));
    }

    #[test]
    fn test_note_store_not_found_is_still_dependency_failure() {
        let error = SummarizationError::from_note_store(&c1(), PortError::not_found("Notes", "C1"));
        assert_eq!(error.kind(), ErrorKind::DependencyUnavailable);
        assert!(error.to_string().contains("note store"));
    }

    #[test]
    fn test_incomplete_message_lists_fields() {
        let error = SummarizationError::from_parse(
            &c1(),
            ParseError::Incomplete {
                missing: vec![SummaryField::CustomerSummary, SummaryField::RecommendedNextStep],
            },
        );
        let message = error.to_string();
        assert!(message.contains("customerSummary, recommendedNextStep"));
        assert_eq!(error.claim_id(), &c1());
    }

    #[test]
    fn test_engine_timeout_kind() {
        let error = SummarizationError::from_engine(&c1(), EngineError::Timeout { timeout_ms: 500 });
        assert_eq!(error.kind(), ErrorKind::EngineTimeout);
        assert!(error.is_retryable());
    }
}
