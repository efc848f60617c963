//! HTTP API tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot` over the
//! in-memory stores and a scripted model backend.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::{AdapterType, HealthRegistry};
use domain_claims::{ClaimSummary, ScriptedBackend, ScriptedReply};
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{
    assert_summary_complete, init_test_tracing, ClaimFixtures, ModelOutputFixtures,
    SummarizerHarness,
};

fn app_for(harness: &SummarizerHarness) -> Router {
    app_with_config(harness, ApiConfig::default())
}

fn app_with_config(harness: &SummarizerHarness, config: ApiConfig) -> Router {
    init_test_tracing();

    let health = HealthRegistry::new()
        .with("claim_store", AdapterType::InMemory, harness.claims.clone())
        .with("note_store", AdapterType::InMemory, harness.notes.clone())
        .with("model_backend", AdapterType::Mock, harness.backend.clone());

    create_router(AppState {
        summarizer: harness.summarizer.clone(),
        claims: harness.claims.clone(),
        notes: harness.notes.clone(),
        health: Arc::new(health),
        config,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(app_for(&harness), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "interface_api");
}

#[tokio::test]
async fn test_readiness_reports_dependencies() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(app_for(&harness), get("/health/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["total_count"], 3);
    assert!(body["dependencies"]["model_backend"].is_object());
    assert_eq!(body["summaries"]["calls"], 0);
}

#[tokio::test]
async fn test_readiness_counts_summaries() {
    let harness = SummarizerHarness::fender_scenario().await;
    let app = app_for(&harness);

    let (status, _) = send(app.clone(), get("/api/v1/claims/C1/summary")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app.clone(), get("/api/v1/claims/C404/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(app, get("/health/ready")).await;
    assert_eq!(body["summaries"]["calls"], 2);
    assert_eq!(body["summaries"]["successes"], 1);
    assert_eq!(body["summaries"]["failures"], 1);
}

#[tokio::test]
async fn test_summary_of_fender_claim() {
    let harness = SummarizerHarness::fender_scenario().await;
    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C1/summary")).await;

    assert_eq!(status, StatusCode::OK);
    let summary: ClaimSummary = serde_json::from_value(body).unwrap();
    assert_summary_complete(&summary);
    assert_eq!(summary, ModelOutputFixtures::fender_summary());
    assert_eq!(harness.backend.call_count(), 1);
}

#[tokio::test]
async fn test_summary_echoes_request_id() {
    let harness = SummarizerHarness::fender_scenario().await;
    let request = Request::builder()
        .uri("/api/v1/claims/C1/summary")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = app_for(&harness).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_request_id_is_minted_when_absent() {
    let harness = SummarizerHarness::fender_scenario().await;
    let response = app_for(&harness)
        .oneshot(get("/api/v1/claims/C1/summary"))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_summary_of_unknown_claim_is_404() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C404/summary")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "claim_not_found");
    assert_eq!(harness.backend.call_count(), 0);
}

#[tokio::test]
async fn test_blank_claim_id_is_400() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(app_for(&harness), get("/api/v1/claims/%20/summary")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_prose_reply_is_502() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::prose());
    harness
        .seed(ClaimFixtures::open_claim(), vec![ClaimFixtures::fender_note()])
        .await;

    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C1/summary")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "malformed_output");
}

#[tokio::test]
async fn test_unreachable_model_is_502() {
    let harness = SummarizerHarness::scripted(vec![ScriptedReply::Unreachable]);
    harness.seed(ClaimFixtures::open_claim(), vec![]).await;

    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C1/summary")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "engine_unavailable");
}

#[tokio::test]
async fn test_slow_model_is_504() {
    let harness = SummarizerHarness::with_timeout(
        ScriptedBackend::with_script(vec![ScriptedReply::Delayed(
            Duration::from_secs(5),
            ModelOutputFixtures::valid_json(),
        )]),
        Duration::from_millis(50),
    );
    harness.seed(ClaimFixtures::open_claim(), vec![]).await;

    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C1/summary")).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "engine_timeout");
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline_is_504() {
    // Engine bound above the request deadline, so the router gives up first
    let harness = SummarizerHarness::with_timeout(
        ScriptedBackend::with_script(vec![ScriptedReply::Delayed(
            Duration::from_secs(300),
            ModelOutputFixtures::valid_json(),
        )]),
        Duration::from_secs(240),
    );
    harness.seed(ClaimFixtures::open_claim(), vec![]).await;
    let config = ApiConfig {
        request_timeout_secs: 1,
        ..ApiConfig::default()
    };

    let (status, body) = send(
        app_with_config(&harness, config),
        get("/api/v1/claims/C1/summary"),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "gateway_timeout");
}

#[tokio::test]
async fn test_ingest_then_summarize() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let app = app_for(&harness);

    let (status, body) = send(
        app.clone(),
        post_json(
            "/api/v1/claims",
            json!([
                { "id": "C7", "status": "open", "lossType": "hail" },
                { "id": "C8", "status": "closed" }
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["count"], 2);

    let (status, body) = send(app.clone(), get("/api/v1/claims/C7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "C7");
    assert_eq!(body["lossType"], "hail");

    let (status, _) = send(
        app.clone(),
        post_json(
            "/api/v1/claims/C7/notes",
            json!({ "text": "hail dents on roof", "author": "adjuster-3" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(app, get("/api/v1/claims/C7/summary")).await;
    assert_eq!(status, StatusCode::OK);

    let prompt = harness.last_prompt().unwrap();
    assert!(prompt.contains("hail dents on roof"));
    assert!(prompt.contains("\"lossType\""));
}

#[tokio::test]
async fn test_empty_ingest_is_400() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, _) = send(app_for(&harness), post_json("/api/v1/claims", json!([]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_note_is_422() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(
        app_for(&harness),
        post_json("/api/v1/claims/C1/notes", json!({ "text": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["details"][0].as_str().unwrap().starts_with("text"));
}

#[tokio::test]
async fn test_list_notes() {
    let harness = SummarizerHarness::fender_scenario().await;
    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C1/notes")).await;

    assert_eq!(status, StatusCode::OK);
    let notes = body.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["text"], "fender bent");
    assert_eq!(notes[0]["author"], "adjuster-7");
}

#[tokio::test]
async fn test_unknown_claim_lookup_is_404() {
    let harness = SummarizerHarness::replying(ModelOutputFixtures::valid_json());
    let (status, body) = send(app_for(&harness), get("/api/v1/claims/C404")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
