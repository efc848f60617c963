//! In-memory stores
//!
//! Process-local implementations of `ClaimStore` and `NoteStore`. They back
//! the service when no database is configured and are what the unit tests
//! run against. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{
    ClaimId, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};

use crate::claim::Claim;
use crate::note::ClaimNote;
use crate::ports::{ClaimStore, NoteStore};

/// In-memory claim store keyed by claim id
#[derive(Debug, Clone, Default)]
pub struct InMemoryClaimStore {
    claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store
    pub async fn with_claims(claims: Vec<Claim>) -> Self {
        let store = Self::new();
        for claim in claims {
            store.insert(claim).await;
        }
        store
    }

    /// Inserts or replaces a single claim
    pub async fn insert(&self, claim: Claim) {
        self.claims.write().await.insert(claim.id.clone(), claim);
    }

    pub async fn len(&self) -> usize {
        self.claims.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claims.read().await.is_empty()
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl HealthCheckable for InMemoryClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-claim-store", 0)
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn get_claim(
        &self,
        id: &ClaimId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Claim, PortError> {
        self.claims
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    async fn put_claims(
        &self,
        claims: Vec<Claim>,
        _metadata: Option<OperationMetadata>,
    ) -> Result<usize, PortError> {
        let count = claims.len();
        let mut stored = self.claims.write().await;
        for claim in claims {
            stored.insert(claim.id.clone(), claim);
        }
        Ok(count)
    }
}

/// In-memory note store, notes grouped by claim in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteStore {
    notes: Arc<RwLock<HashMap<ClaimId, Vec<ClaimNote>>>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store
    pub async fn with_notes(notes: Vec<ClaimNote>) -> Self {
        let store = Self::new();
        for note in notes {
            store.insert(note).await;
        }
        store
    }

    /// Appends a note without validation
    pub async fn insert(&self, note: ClaimNote) {
        self.notes
            .write()
            .await
            .entry(note.claim_id.clone())
            .or_default()
            .push(note);
    }

    /// Total number of notes across all claims
    pub async fn len(&self) -> usize {
        self.notes.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl DomainPort for InMemoryNoteStore {}

#[async_trait]
impl HealthCheckable for InMemoryNoteStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("in-memory-note-store", 0)
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn get_notes(
        &self,
        claim_id: &ClaimId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<ClaimNote>, PortError> {
        Ok(self
            .notes
            .read()
            .await
            .get(claim_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn put_note(
        &self,
        note: ClaimNote,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ClaimNote, PortError> {
        if note.text.trim().is_empty() {
            return Err(PortError::validation_field("Note text must not be empty", "text"));
        }
        self.insert(note.clone()).await;
        Ok(note)
    }
}
