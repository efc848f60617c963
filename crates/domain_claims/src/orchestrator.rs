//! Summarization orchestrator
//!
//! Owns the control flow of one `summarize` call:
//!
//! ```text
//! claim_id ──┬── ClaimStore::get_claim ──┐
//!            └── NoteStore::get_notes ───┴── SummarizationEngine ── ResponseParser ── ClaimSummary
//! ```
//!
//! The two store lookups run concurrently and both must succeed before the
//! model is called. A missing claim therefore never reaches the engine.
//! The orchestrator holds no per-call state, so any number of calls may run
//! at once on the same instance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, OperationMetadata};

use crate::engine::SummarizationEngine;
use crate::error::SummarizationError;
use crate::instrumented::SummaryMetrics;
use crate::parser::ResponseParser;
use crate::ports::{ClaimStore, NoteStore};
use crate::summary::ClaimSummary;

/// Entry point used by callers that want a claim summary
#[async_trait]
pub trait ClaimSummarizer: Send + Sync {
    /// Produces the four-part summary of a claim
    async fn summarize(
        &self,
        claim_id: &ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimSummary, SummarizationError>;

    /// Outcome counters, for summarizers that keep them
    fn summary_metrics(&self) -> Option<SummaryMetrics> {
        None
    }
}

/// Coordinates stores, engine and parser
#[derive(Clone)]
pub struct SummarizationOrchestrator {
    claims: Arc<dyn ClaimStore>,
    notes: Arc<dyn NoteStore>,
    engine: SummarizationEngine,
    parser: ResponseParser,
}

impl std::fmt::Debug for SummarizationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationOrchestrator")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl SummarizationOrchestrator {
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        notes: Arc<dyn NoteStore>,
        engine: SummarizationEngine,
    ) -> Self {
        Self {
            claims,
            notes,
            engine,
            parser: ResponseParser::new(),
        }
    }
}

#[async_trait]
impl ClaimSummarizer for SummarizationOrchestrator {
    #[instrument(skip(self, metadata), fields(claim_id = %claim_id))]
    async fn summarize(
        &self,
        claim_id: &ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimSummary, SummarizationError> {
        let claim_lookup = async {
            self.claims
                .get_claim(claim_id, metadata.clone())
                .await
                .map_err(|e| SummarizationError::from_claim_store(claim_id, e))
        };
        let notes_lookup = async {
            self.notes
                .get_notes(claim_id, metadata.clone())
                .await
                .map_err(|e| SummarizationError::from_note_store(claim_id, e))
        };

        // The first failure wins; the other lookup is dropped
        let (claim, notes) = tokio::try_join!(claim_lookup, notes_lookup)?;
        debug!(note_count = notes.len(), "Claim and notes retrieved");

        let raw = self
            .engine
            .generate(&claim, &notes)
            .await
            .map_err(|e| SummarizationError::from_engine(claim_id, e))?;

        self.parser
            .parse(raw.as_str())
            .map_err(|e| SummarizationError::from_parse(claim_id, e))
    }
}
