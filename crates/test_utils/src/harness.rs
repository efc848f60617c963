//! Summarizer Harness
//!
//! Wires in-memory stores, a scripted model backend, and the instrumented
//! orchestrator together the same way the server does, so tests exercise
//! the production call path without a database or a model endpoint.

use std::sync::Arc;
use std::time::Duration;

use domain_claims::adapters::{InMemoryClaimStore, InMemoryNoteStore};
use domain_claims::{
    Claim, ClaimNote, EngineConfig, InstrumentedSummarizer, ScriptedBackend, ScriptedReply,
    SummarizationEngine, SummarizationOrchestrator,
};

use crate::fixtures::{ClaimFixtures, ModelOutputFixtures};

/// Model id the harness passes to the backend
pub const TEST_MODEL_ID: &str = "test-model";

/// A fully wired summarizer over in-memory dependencies
pub struct SummarizerHarness {
    pub claims: Arc<InMemoryClaimStore>,
    pub notes: Arc<InMemoryNoteStore>,
    pub backend: Arc<ScriptedBackend>,
    pub summarizer: Arc<InstrumentedSummarizer<SummarizationOrchestrator>>,
}

impl SummarizerHarness {
    /// Empty stores and the given backend, with a short model timeout
    pub fn new(backend: ScriptedBackend) -> Self {
        Self::with_timeout(backend, Duration::from_secs(5))
    }

    pub fn with_timeout(backend: ScriptedBackend, request_timeout: Duration) -> Self {
        let claims = Arc::new(InMemoryClaimStore::new());
        let notes = Arc::new(InMemoryNoteStore::new());
        let backend = Arc::new(backend);

        let engine = SummarizationEngine::new(
            backend.clone(),
            EngineConfig::new(TEST_MODEL_ID).request_timeout(request_timeout),
        );
        let orchestrator = SummarizationOrchestrator::new(claims.clone(), notes.clone(), engine);

        Self {
            claims,
            notes,
            backend,
            summarizer: Arc::new(InstrumentedSummarizer::new(orchestrator)),
        }
    }

    /// Backend answering every call with `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::new(ScriptedBackend::replying(reply))
    }

    /// Backend playing `script` in order
    pub fn scripted(script: Vec<ScriptedReply>) -> Self {
        Self::new(ScriptedBackend::with_script(script))
    }

    /// The standard scenario: claim `C1` with one "fender bent" note and a
    /// model that returns a valid summary
    pub async fn fender_scenario() -> Self {
        let harness = Self::replying(ModelOutputFixtures::valid_json());
        harness
            .seed(ClaimFixtures::open_claim(), vec![ClaimFixtures::fender_note()])
            .await;
        harness
    }

    /// Stores a claim together with its notes
    pub async fn seed(&self, claim: Claim, notes: Vec<ClaimNote>) {
        self.claims.insert(claim).await;
        for note in notes {
            self.notes.insert(note).await;
        }
    }

    /// The prompt of the most recent model call
    pub fn last_prompt(&self) -> Option<String> {
        self.backend.last_request().map(|r| r.prompt)
    }
}
