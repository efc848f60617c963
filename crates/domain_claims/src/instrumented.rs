//! Observability wrapper for summarizers
//!
//! `InstrumentedSummarizer` wraps any [`ClaimSummarizer`] and adds the
//! per-call span, the outcome log line, and process-wide counters. It never
//! changes the result of the inner call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use core_kernel::{ClaimId, OperationMetadata};

use crate::error::SummarizationError;
use crate::orchestrator::ClaimSummarizer;
use crate::summary::ClaimSummary;

/// Point-in-time copy of the summarizer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    pub total_duration_ms: u64,
}

#[derive(Debug, Default)]
struct Counters {
    calls: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    total_duration_ms: AtomicU64,
}

/// Adds tracing and counters around a summarizer
#[derive(Debug)]
pub struct InstrumentedSummarizer<S> {
    inner: S,
    counters: Counters,
}

impl<S: ClaimSummarizer> InstrumentedSummarizer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counters: Counters::default(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Current counter values
    pub fn metrics(&self) -> SummaryMetrics {
        SummaryMetrics {
            calls: self.counters.calls.load(Ordering::Relaxed),
            successes: self.counters.successes.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            total_duration_ms: self.counters.total_duration_ms.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl<S: ClaimSummarizer> ClaimSummarizer for InstrumentedSummarizer<S> {
    async fn summarize(
        &self,
        claim_id: &ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimSummary, SummarizationError> {
        let mut metadata = metadata.unwrap_or_default();
        let trace_id = metadata.ensure_correlation_id().to_string();

        let span = info_span!("summarize_claim", claim_id = %claim_id, trace_id = %trace_id);
        let started = Instant::now();
        self.counters.calls.fetch_add(1, Ordering::Relaxed);

        let result = self
            .inner
            .summarize(claim_id, Some(metadata))
            .instrument(span.clone())
            .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        self.counters
            .total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);

        span.in_scope(|| match &result {
            Ok(_) => {
                self.counters.successes.fetch_add(1, Ordering::Relaxed);
                info!(duration_ms, "Claim summarized");
            }
            Err(error) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    duration_ms,
                    error_kind = %error.kind(),
                    retryable = error.is_retryable(),
                    error = %error,
                    "Claim summarization failed"
                );
            }
        });

        result
    }

    fn summary_metrics(&self) -> Option<SummaryMetrics> {
        Some(self.metrics())
    }
}
