//! PostgreSQL store tests
//!
//! These start a Postgres container and are ignored by default. Run them with
//! `cargo test -p infra_db -- --ignored` on a machine with Docker.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use core_kernel::{AdapterHealth, ClaimId, HealthCheckable, PortError};
use domain_claims::{
    ClaimNote, ClaimStore, ClaimSummarizer, EngineConfig, NoteStore, ScriptedBackend,
    SummarizationEngine, SummarizationOrchestrator,
};
use infra_db::{PostgresClaimStore, PostgresNoteStore};
use test_utils::{get_shared_test_database, ClaimBuilder, ModelOutputFixtures};

/// A claim id no other test uses, so tests can share one database
fn fresh_claim_id() -> ClaimId {
    ClaimId::new(format!("CLM-{}", Uuid::new_v4().simple())).unwrap()
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_claim_upsert_and_lookup() {
    let db = get_shared_test_database().await;
    let store = PostgresClaimStore::new(db.pool().clone());
    let claim_id = fresh_claim_id();

    let claim = ClaimBuilder::new()
        .with_id(claim_id.as_str())
        .with_attribute("status", "open")
        .build();
    assert_eq!(store.put_claims(vec![claim], None).await.unwrap(), 1);

    let updated = ClaimBuilder::new()
        .with_id(claim_id.as_str())
        .bare()
        .with_attribute("status", "closed")
        .build();
    store.put_claims(vec![updated], None).await.unwrap();

    let stored = store.get_claim(&claim_id, None).await.unwrap();
    assert_eq!(stored.id, claim_id);
    assert_eq!(stored.attribute("status").unwrap(), "closed");
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_unknown_claim_is_not_found() {
    let db = get_shared_test_database().await;
    let store = PostgresClaimStore::new(db.pool().clone());

    let error = store.get_claim(&fresh_claim_id(), None).await.unwrap_err();
    assert!(matches!(error, PortError::NotFound { .. }), "got {:?}", error);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_notes_are_ordered_oldest_first() {
    let db = get_shared_test_database().await;
    let store = PostgresNoteStore::new(db.pool().clone());
    let claim_id = fresh_claim_id();

    let later = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
    let earlier = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap();

    store
        .put_note(ClaimNote::new(claim_id.clone(), "undated"), None)
        .await
        .unwrap();
    store
        .put_note(ClaimNote::new(claim_id.clone(), "second").recorded_at(later), None)
        .await
        .unwrap();
    store
        .put_note(ClaimNote::new(claim_id.clone(), "first").recorded_at(earlier).by("adjuster-7"), None)
        .await
        .unwrap();

    let notes = store.get_notes(&claim_id, None).await.unwrap();
    let texts: Vec<_> = notes.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "undated"]);
    assert_eq!(notes[0].author.as_deref(), Some("adjuster-7"));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_claim_without_notes_yields_empty_list() {
    let db = get_shared_test_database().await;
    let store = PostgresNoteStore::new(db.pool().clone());

    let notes = store.get_notes(&fresh_claim_id(), None).await.unwrap();
    assert!(notes.is_empty());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_blank_note_is_rejected() {
    let db = get_shared_test_database().await;
    let store = PostgresNoteStore::new(db.pool().clone());

    let error = store
        .put_note(ClaimNote::new(fresh_claim_id(), "  "), None)
        .await
        .unwrap_err();
    assert!(matches!(error, PortError::Validation { .. }), "got {:?}", error);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_stores_report_healthy() {
    let db = get_shared_test_database().await;

    let claims = PostgresClaimStore::new(db.pool().clone());
    let notes = PostgresNoteStore::new(db.pool().clone());

    assert_eq!(claims.health_check().await.status, AdapterHealth::Healthy);
    assert_eq!(notes.health_check().await.status, AdapterHealth::Healthy);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_summarize_over_postgres() {
    let db = get_shared_test_database().await;
    let claims = Arc::new(PostgresClaimStore::new(db.pool().clone()));
    let notes = Arc::new(PostgresNoteStore::new(db.pool().clone()));
    let backend = Arc::new(ScriptedBackend::replying(ModelOutputFixtures::valid_json()));
    let claim_id = fresh_claim_id();

    claims
        .put_claims(
            vec![ClaimBuilder::new()
                .with_id(claim_id.as_str())
                .with_attribute("policyNumber", "P-77")
                .build()],
            None,
        )
        .await
        .unwrap();
    notes
        .put_note(ClaimNote::new(claim_id.clone(), "fender bent"), None)
        .await
        .unwrap();

    let orchestrator = SummarizationOrchestrator::new(
        claims,
        notes,
        SummarizationEngine::new(backend.clone(), EngineConfig::new("test-model")),
    );

    let summary = orchestrator.summarize(&claim_id, None).await.unwrap();
    assert_eq!(summary, ModelOutputFixtures::fender_summary());

    let prompt = backend.last_request().unwrap().prompt;
    assert!(prompt.contains("fender bent"));
    assert!(prompt.contains("\"P-77\""));
}
