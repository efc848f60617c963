//! Claims Domain Ports
//!
//! The summarization pipeline depends on three collaborators, each behind a
//! port trait so that the orchestrator never sees which adapter is in use:
//!
//! - **ClaimStore**: key-based lookup and batch insert of claim records
//! - **NoteStore**: per-claim note retrieval and upload
//! - **GenerativeTextBackend**: one prompt in, raw model text out
//!
//! Adapters live in `crate::adapters` (in-memory, HTTP model backend) and in
//! `infra_db` (PostgreSQL stores).
//!
//! ```rust,ignore
//! let claims: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool.clone()));
//! let notes: Arc<dyn NoteStore> = Arc::new(PostgresNoteStore::new(pool));
//! let backend: Arc<dyn GenerativeTextBackend> = Arc::new(HttpGenerativeBackend::new(config)?);
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, OperationMetadata, PortError};

use crate::claim::Claim;
use crate::note::ClaimNote;

/// Port for the claim record store
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Retrieves a claim by ID
    ///
    /// # Returns
    ///
    /// The claim if found, or `PortError::NotFound`
    async fn get_claim(
        &self,
        id: &ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Claim, PortError>;

    /// Inserts or replaces a batch of claims
    ///
    /// The batch is applied atomically where the backing store allows it.
    async fn put_claims(
        &self,
        claims: Vec<Claim>,
        metadata: Option<OperationMetadata>,
    ) -> Result<usize, PortError>;
}

/// Port for the claim note store
#[async_trait]
pub trait NoteStore: DomainPort + HealthCheckable {
    /// Retrieves every note of a claim
    ///
    /// A claim without notes yields an empty vector; this call never reports
    /// `PortError::NotFound`.
    async fn get_notes(
        &self,
        claim_id: &ClaimId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ClaimNote>, PortError>;

    /// Stores a note
    async fn put_note(
        &self,
        note: ClaimNote,
        metadata: Option<OperationMetadata>,
    ) -> Result<ClaimNote, PortError>;
}

/// A single text-generation call
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    /// Model identifier understood by the backend
    pub model_id: String,
    /// The full prompt
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Port for the generative-text model
#[async_trait]
pub trait GenerativeTextBackend: DomainPort + HealthCheckable {
    /// Sends one prompt and returns the model's text verbatim
    ///
    /// Transport failures are reported as `PortError::Connection`,
    /// `PortError::Timeout`, `PortError::ServiceUnavailable` and friends.
    async fn invoke(&self, request: &InvocationRequest) -> Result<String, PortError>;
}

/// Test doubles for the claims ports
///
/// `ScriptedBackend` answers with a queue of canned responses and counts its
/// invocations; `FailingStore` fails every call with a chosen error.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// A scripted reply of the mock backend
    #[derive(Debug, Clone)]
    pub enum ScriptedReply {
        /// Return this text
        Text(String),
        /// Fail with a connection error
        Unreachable,
        /// Fail with a backend-reported timeout
        TimedOut,
        /// Sleep, then return this text
        Delayed(Duration, String),
    }

    /// Mock generative backend with canned replies
    ///
    /// When the script runs dry the last reply is repeated.
    #[derive(Debug, Default)]
    pub struct ScriptedBackend {
        replies: Mutex<VecDeque<ScriptedReply>>,
        last_reply: Mutex<Option<ScriptedReply>>,
        requests: Mutex<Vec<InvocationRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        /// Backend that always answers with `text`
        pub fn replying(text: impl Into<String>) -> Self {
            Self::with_script(vec![ScriptedReply::Text(text.into())])
        }

        /// Backend that plays `replies` in order
        pub fn with_script(replies: Vec<ScriptedReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            }
        }

        /// Number of `invoke` calls so far
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// The most recent request, if any
        pub fn last_request(&self) -> Option<InvocationRequest> {
            self.requests.lock().ok().and_then(|r| r.last().cloned())
        }

        /// Every request received, oldest first
        pub fn requests(&self) -> Vec<InvocationRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn next_reply(&self) -> Option<ScriptedReply> {
            let mut replies = self.replies.lock().ok()?;
            let mut last = self.last_reply.lock().ok()?;
            match replies.pop_front() {
                Some(reply) => {
                    *last = Some(reply.clone());
                    Some(reply)
                }
                None => last.clone(),
            }
        }
    }

    impl DomainPort for ScriptedBackend {}

    #[async_trait]
    impl HealthCheckable for ScriptedBackend {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("scripted-backend", 0)
        }
    }

    #[async_trait]
    impl GenerativeTextBackend for ScriptedBackend {
        async fn invoke(&self, request: &InvocationRequest) -> Result<String, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }

            match self.next_reply() {
                Some(ScriptedReply::Text(text)) => Ok(text),
                Some(ScriptedReply::Unreachable) => {
                    Err(PortError::connection("scripted backend unreachable"))
                }
                Some(ScriptedReply::TimedOut) => Err(PortError::timeout("invoke", 0)),
                Some(ScriptedReply::Delayed(delay, text)) => {
                    tokio::time::sleep(delay).await;
                    Ok(text)
                }
                None => Err(PortError::internal("scripted backend has no replies")),
            }
        }
    }

    /// How a [`FailingStore`] fails
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Failure {
        /// `PortError::Connection`
        Unreachable,
        /// `PortError::Timeout`
        TimedOut,
        /// `PortError::Internal`
        Internal,
    }

    impl Failure {
        fn to_error(self, store: &str) -> PortError {
            match self {
                Failure::Unreachable => PortError::connection(format!("{} unreachable", store)),
                Failure::TimedOut => PortError::timeout(format!("{} lookup", store), 1000),
                Failure::Internal => PortError::internal(format!("{} failed", store)),
            }
        }
    }

    /// A claim and note store that fails every call
    #[derive(Debug, Clone)]
    pub struct FailingStore {
        failure: Failure,
        calls: Arc<AtomicUsize>,
    }

    impl FailingStore {
        /// Creates a store that fails with `failure`
        pub fn new(failure: Failure) -> Self {
            Self {
                failure,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Number of calls received
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for FailingStore {}

    #[async_trait]
    impl HealthCheckable for FailingStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "failing-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms: 0,
                message: Some(format!("{:?}", self.failure)),
                checked_at: chrono::Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimStore for FailingStore {
        async fn get_claim(
            &self,
            _id: &ClaimId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Claim, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.failure.to_error("claim store"))
        }

        async fn put_claims(
            &self,
            _claims: Vec<Claim>,
            _metadata: Option<OperationMetadata>,
        ) -> Result<usize, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.failure.to_error("claim store"))
        }
    }

    #[async_trait]
    impl NoteStore for FailingStore {
        async fn get_notes(
            &self,
            _claim_id: &ClaimId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Vec<ClaimNote>, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.failure.to_error("note store"))
        }

        async fn put_note(
            &self,
            _note: ClaimNote,
            _metadata: Option<OperationMetadata>,
        ) -> Result<ClaimNote, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(self.failure.to_error("note store"))
        }
    }
}
