//! # Integration Tests for sumproof-api
//!
//! Drives the full router with `oneshot`: proof generation and
//! verification over the mock backend, error mapping, health probes,
//! CORS preflight, metrics and OpenAPI. One test runs real Groth16.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sumproof_api::routes::proof::{GENERATED_MESSAGE, INVALID_MESSAGE, VALID_MESSAGE};
use sumproof_api::AppState;
use sumproof_zkp::{Groth16Backend, MockBackend, ProofService};

fn mock_state() -> AppState {
    AppState::new(Arc::new(ProofService::new(MockBackend::new())))
}

fn failing_state() -> AppState {
    AppState::new(Arc::new(ProofService::new(MockBackend::failing(
        "entropy source unavailable",
    ))))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn generate(app: &axum::Router, a: i64, b: i64, sum: i64) -> (StatusCode, Value) {
    send(
        app,
        post_json("/api/proof/generate", &json!({"a": a, "b": b, "sum": sum})),
    )
    .await
}

async fn verify(app: &axum::Router, proof: &Value, sum: i64) -> (StatusCode, Value) {
    send(
        app,
        post_json("/api/proof/verify", &json!({"proof": proof, "sum": sum})),
    )
    .await
}

// -- Generate -----------------------------------------------------------------

#[tokio::test]
async fn generate_returns_proof_and_sum() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = generate(&app, 5, 3, 8).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sum"], 8);
    assert_eq!(body["message"], GENERATED_MESSAGE);
    assert!(body["proof"].as_str().is_some_and(|p| !p.is_empty()));
}

#[tokio::test]
async fn generate_with_wrong_sum_is_500() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = generate(&app, 5, 3, 9).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PROOF_GENERATION_FAILED");
    assert_eq!(body["error"], "Failed to generate proof");
}

#[tokio::test]
async fn generate_with_malformed_body_is_400() {
    let app = sumproof_api::app(mock_state());
    for body in [
        json!({"a": 5, "b": 3}),
        json!({"a": "five", "b": 3, "sum": 8}),
        json!([5, 3, 8]),
        json!(8),
        json!(null),
    ] {
        let (status, resp) = send(&app, post_json("/api/proof/generate", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp, json!({"error": "Invalid request body", "code": "BAD_REQUEST"}));
    }

    let raw = Request::builder()
        .method(Method::POST)
        .uri("/api/proof/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_eq!(send(&app, raw).await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_content_type_is_400() {
    let app = sumproof_api::app(mock_state());
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/proof/generate")
        .body(Body::from(r#"{"a":1,"b":2,"sum":3}"#))
        .unwrap();
    assert_eq!(send(&app, req).await.0, StatusCode::BAD_REQUEST);
}

// -- Verify -------------------------------------------------------------------

#[tokio::test]
async fn generated_proof_verifies() {
    let app = sumproof_api::app(mock_state());
    let (_, generated) = generate(&app, 5, 3, 8).await;
    let (status, body) = verify(&app, &generated["proof"], 8).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["message"], VALID_MESSAGE);
}

#[tokio::test]
async fn proof_for_other_sum_is_invalid_not_error() {
    let app = sumproof_api::app(mock_state());
    let (_, generated) = generate(&app, 5, 3, 8).await;
    let (status, body) = verify(&app, &generated["proof"], 9).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], INVALID_MESSAGE);
}

#[tokio::test]
async fn proof_from_another_process_is_invalid() {
    let app = sumproof_api::app(mock_state());
    let other = sumproof_api::app(mock_state());
    let (_, generated) = generate(&other, 5, 3, 8).await;
    let (status, body) = verify(&app, &generated["proof"], 8).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn junk_proof_is_400() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = verify(&app, &json!("AAECAw=="), 8).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid proof format");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn array_shaped_verify_body_is_400() {
    let app = sumproof_api::app(mock_state());
    let (_, generated) = generate(&app, 5, 3, 8).await;
    let body = json!([generated["proof"], 8]);
    let (status, resp) = send(&app, post_json("/api/proof/verify", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Invalid request body");
}

#[tokio::test]
async fn non_base64_proof_is_400() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = verify(&app, &json!("not base64!"), 8).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = sumproof_api::app(mock_state());
    let huge = "A".repeat(sumproof_api::MAX_BODY_BYTES + 4);
    let (status, _) = verify(&app, &json!(huge), 8).await;
    assert!(status.is_client_error());
}

// -- Setup failure ------------------------------------------------------------

#[tokio::test]
async fn setup_failure_is_500_on_both_routes() {
    let app = sumproof_api::app(failing_state());
    let (status, body) = generate(&app, 5, 3, 8).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Setup failed", "code": "SETUP_FAILED"}));

    let (status, body) = verify(&app, &json!("AAECAw=="), 8).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "SETUP_FAILED");
}

#[tokio::test]
async fn setup_failure_outranks_malformed_body() {
    let app = sumproof_api::app(failing_state());
    for uri in ["/api/proof/generate", "/api/proof/verify"] {
        let (status, body) = send(&app, post_json(uri, &json!([1, 2]))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["code"], "SETUP_FAILED");
    }
}

#[tokio::test]
async fn malformed_first_request_still_runs_setup() {
    let state = mock_state();
    let service = Arc::clone(&state.service);
    let app = sumproof_api::app(state);

    let (status, _) = send(&app, post_json("/api/proof/generate", &json!({"a": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(service.setup_status().as_str(), "ready");
}

// -- Health -------------------------------------------------------------------

#[tokio::test]
async fn health_payload() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "zkp-api"}));
}

#[tokio::test]
async fn liveness_probe() {
    let app = sumproof_api::app(mock_state());
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn readiness_tracks_setup() {
    let state = mock_state();
    let service = Arc::clone(&state.service);
    let app = sumproof_api::app(state);

    let (status, body) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "not_started");
    assert_eq!(body["backend"], "mock");
    assert_eq!(body["relation"], "addition");
    assert_eq!(body["fingerprint"], service.relation().fingerprint());

    service.ensure_ready().unwrap();
    let (status, body) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn readiness_is_503_after_failed_setup() {
    let app = sumproof_api::app(failing_state());
    generate(&app, 1, 1, 2).await;
    let (status, body) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "failed");
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("entropy source unavailable")));
}

// -- CORS ---------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight() {
    let app = sumproof_api::app(mock_state());
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/proof/generate")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn cors_headers_on_simple_request() {
    let app = sumproof_api::app(mock_state());
    let req = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

// -- Metrics & OpenAPI --------------------------------------------------------

#[tokio::test]
async fn metrics_404_without_exporter() {
    let app = sumproof_api::app(mock_state());
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_served_with_exporter() {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle();
    let app = sumproof_api::app(mock_state().with_prometheus(handle));
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = sumproof_api::app(mock_state());
    let response = app.oneshot(get("/api/proof/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = sumproof_api::app(mock_state());
    let (status, body) = send(&app, get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/proof/verify"].is_object());
}

// -- Groth16 ------------------------------------------------------------------

#[tokio::test]
async fn groth16_round_trip_over_http() {
    let state = AppState::new(Arc::new(ProofService::new(Groth16Backend::new())));
    let app = sumproof_api::app(state);

    let (status, generated) = generate(&app, 5, 3, 8).await;
    assert_eq!(status, StatusCode::OK);
    let proof = generated["proof"].as_str().unwrap();
    // 128 bytes -> 172 base64 characters with padding.
    assert_eq!(proof.len(), 172);

    let (_, body) = verify(&app, &generated["proof"], 8).await;
    assert_eq!(body["valid"], true);
    let (_, body) = verify(&app, &generated["proof"], 9).await;
    assert_eq!(body["valid"], false);

    let (status, _) = generate(&app, 5, 3, 9).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
