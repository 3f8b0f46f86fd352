//! API Integration Tests
//!
//! The router runs against in-process classifier and generator doubles that
//! count their calls, so every test is hermetic.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use ecc_api::{
    create_router,
    gateway::{self, GatewayRequest},
    state::AppState,
};
use ecc_core::{AnswerGenerator, AppConfig, EccError, Query, RelevanceClassifier};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const LAB_HOURS: &str = "The ECC Lab is open Monday–Friday...";

struct MockClassifier {
    relevant: Result<bool, String>,
    calls: AtomicUsize,
}

#[async_trait]
impl RelevanceClassifier for MockClassifier {
    async fn classify(&self, _query: &Query) -> ecc_core::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.relevant.clone().map_err(EccError::LlmError)
    }
}

#[derive(Clone)]
enum Generation {
    Text(&'static str),
    Empty,
    Fault(&'static str),
}

struct MockGenerator {
    outcome: Generation,
    calls: AtomicUsize,
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(&self, _query: &Query) -> ecc_core::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome.clone() {
            Generation::Text(text) => Ok(text.to_string()),
            Generation::Empty => Err(EccError::EmptyGeneration),
            Generation::Fault(msg) => Err(EccError::LlmError(msg.to_string())),
        }
    }
}

struct Harness {
    state: Arc<AppState>,
    classifier: Arc<MockClassifier>,
    generator: Arc<MockGenerator>,
}

impl Harness {
    fn new(
        guardrails: bool,
        store: Option<&str>,
        relevant: Result<bool, String>,
        outcome: Generation,
    ) -> Self {
        let mut config = AppConfig::default();
        config.bot.enable_guardrails = guardrails;
        config.bot.vector_store_id = store.map(str::to_string);

        let classifier = Arc::new(MockClassifier {
            relevant,
            calls: AtomicUsize::new(0),
        });
        let generator = Arc::new(MockGenerator {
            outcome,
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState::new(config, classifier.clone(), generator.clone()));

        Self {
            state,
            classifier,
            generator,
        }
    }

    /// Guardrails off, store configured, generator answers with lab hours
    fn default_answering() -> Self {
        Self::new(false, Some("vs_ecc"), Ok(true), Generation::Text(LAB_HOURS))
    }

    fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    fn classify_calls(&self) -> usize {
        self.classifier.calls.load(Ordering::SeqCst)
    }

    fn generate_calls(&self) -> usize {
        self.generator.calls.load(Ordering::SeqCst)
    }
}

fn bot_request(method: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/bot")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let harness = Harness::default_answering();

    let (status, json) = send_json(
        harness.router(),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "ok", "message": "Provost Bot API is running."})
    );
    assert_eq!(harness.classify_calls(), 0);
    assert_eq!(harness.generate_calls(), 0);
}

#[tokio::test]
async fn test_openapi_document() {
    let harness = Harness::default_answering();

    let (status, json) = send_json(
        harness.router(),
        Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/bot"].is_object());
    assert!(json["paths"]["/"].is_object());
}

// =============================================================================
// Bot Tests
// =============================================================================

#[tokio::test]
async fn test_answer_passes_through() {
    let harness = Harness::default_answering();

    let (status, headers, body) = send(
        harness.router(),
        bot_request("POST", r#"{"query": "What are the ECC lab hours?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"response": LAB_HOURS}));
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(harness.classify_calls(), 0);
    assert_eq!(harness.generate_calls(), 1);
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected_without_calls() {
    let harness = Harness::new(true, Some("vs_ecc"), Ok(true), Generation::Text(LAB_HOURS));

    let bodies = [
        "",
        "not json",
        "{}",
        r#"{"query": ""}"#,
        r#"{"query": "   "}"#,
        r#"{"query": null}"#,
        r#"{"question": "hours?"}"#,
    ];
    for body in bodies {
        let (status, json) = send_json(harness.router(), bot_request("POST", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(
            json,
            json!({"error": "Request body must be JSON and contain a 'query' key."})
        );
    }

    assert_eq!(harness.classify_calls(), 0);
    assert_eq!(harness.generate_calls(), 0);
}

#[tokio::test]
async fn test_guardrail_refusal_skips_generation() {
    let harness = Harness::new(true, Some("vs_ecc"), Ok(false), Generation::Text(LAB_HOURS));

    let (status, json) = send_json(
        harness.router(),
        bot_request("POST", r#"{"query": "Write me a poem about pirates"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"response": "Sorry, i cannot help you with that!"}));
    assert_eq!(harness.classify_calls(), 1);
    assert_eq!(harness.generate_calls(), 0);
}

#[tokio::test]
async fn test_guardrail_pass_reaches_generator() {
    let harness = Harness::new(true, Some("vs_ecc"), Ok(true), Generation::Text(LAB_HOURS));

    let (status, json) = send_json(
        harness.router(),
        bot_request("POST", r#"{"query": "What are the ECC lab hours?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], LAB_HOURS);
    assert_eq!(harness.classify_calls(), 1);
    assert_eq!(harness.generate_calls(), 1);
}

#[tokio::test]
async fn test_guardrail_fault_is_server_error() {
    let harness = Harness::new(
        true,
        Some("vs_ecc"),
        Err("OpenAI error (401): Incorrect API key provided".to_string()),
        Generation::Text(LAB_HOURS),
    );

    let (status, json) = send_json(
        harness.router(),
        bot_request("POST", r#"{"query": "hours?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "OpenAI error (401): Incorrect API key provided");
    assert_eq!(harness.generate_calls(), 0);
}

#[tokio::test]
async fn test_missing_vector_store() {
    for store in [None, Some("")] {
        let harness = Harness::new(false, store, Ok(true), Generation::Text(LAB_HOURS));

        let (status, json) = send_json(
            harness.router(),
            bot_request("POST", r#"{"query": "What are the ECC lab hours?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"error": "VECTORDBID environment variable not set."}));
        assert_eq!(harness.generate_calls(), 0);
    }
}

#[tokio::test]
async fn test_empty_generation() {
    let harness = Harness::new(false, Some("vs_ecc"), Ok(true), Generation::Empty);

    let (status, json) = send_json(
        harness.router(),
        bot_request("POST", r#"{"query": "hours?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"response": "Error in generating response."}));
}

#[tokio::test]
async fn test_upstream_fault() {
    let harness = Harness::new(
        false,
        Some("vs_ecc"),
        Ok(true),
        Generation::Fault("OpenAI error (500): The server had an error"),
    );

    let (status, json) = send_json(
        harness.router(),
        bot_request("POST", r#"{"query": "hours?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "OpenAI error (500): The server had an error"}));
}

#[tokio::test]
async fn test_options_preflight() {
    // State is irrelevant: no store, guardrails on, failing generator
    let harness = Harness::new(true, None, Err("down".to_string()), Generation::Empty);

    let (status, headers, body) = send(harness.router(), bot_request("OPTIONS", "")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert!(headers.get(header::CONTENT_TYPE).is_none());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(harness.classify_calls(), 0);
    assert_eq!(harness.generate_calls(), 0);
}

#[tokio::test]
async fn test_other_methods_not_allowed() {
    let harness = Harness::default_answering();

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let (status, headers, body) = send(harness.router(), bot_request(method, "")).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method: {method}");
        assert_eq!(headers[header::ALLOW], "POST, OPTIONS");
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            json!({"error": "Method not allowed", "allowed": ["POST", "OPTIONS"]})
        );
    }
    assert_eq!(harness.generate_calls(), 0);
}

// =============================================================================
// Non-bot Route Tests
// =============================================================================

#[tokio::test]
async fn test_non_bot_errors_are_json() {
    let harness = Harness::default_answering();

    let cases = [
        ("POST", "/", StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        ("DELETE", "/api-docs/openapi.json", StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        ("GET", "/missing", StatusCode::NOT_FOUND, "Not found"),
        ("POST", "/bot/extra", StatusCode::NOT_FOUND, "Not found"),
    ];

    for (method, uri, expected, message) in cases {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(harness.router(), request).await;

        assert_eq!(status, expected, "{method} {uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers["access-control-allow-origin"], "*");
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], message);
    }
    assert_eq!(harness.generate_calls(), 0);
}

// =============================================================================
// Gateway Tests
// =============================================================================

#[tokio::test]
async fn test_gateway_matches_router() {
    let cases = [
        ("POST", Some(r#"{"query": "What are the ECC lab hours?"}"#)),
        ("POST", Some("not json")),
        ("POST", None),
        ("OPTIONS", None),
        ("PUT", Some("{}")),
    ];

    for (method, body) in cases {
        let harness = Harness::default_answering();

        let (status, _, http_body) = send(
            harness.router(),
            bot_request(method, body.unwrap_or_default()),
        )
        .await;

        let event = GatewayRequest {
            method: method.to_string(),
            body: body.map(str::to_string),
        };
        let response = gateway::invoke(&harness.state, event).await;

        assert_eq!(response.status_code, status.as_u16(), "{method} {body:?}");
        assert_eq!(response.body.as_bytes(), http_body.as_slice());
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    }
}

#[tokio::test]
async fn test_gateway_lowercase_method() {
    let harness = Harness::default_answering();

    let response = gateway::invoke(
        &harness.state,
        GatewayRequest {
            method: "post".to_string(),
            body: Some(r#"{"query": "hours?"}"#.to_string()),
        },
    )
    .await;

    assert_eq!(response.status_code, 200);
    let json: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["response"], LAB_HOURS);
}

#[tokio::test]
async fn test_gateway_event_without_method_is_not_allowed() {
    let harness = Harness::default_answering();
    let event: GatewayRequest =
        serde_json::from_value(json!({"body": r#"{"query": "hours?"}"#})).unwrap();

    let response = gateway::invoke(&harness.state, event).await;

    assert_eq!(response.status_code, 405);
    assert_eq!(response.headers["Allow"], "POST, OPTIONS");
    assert_eq!(harness.generate_calls(), 0);
}
