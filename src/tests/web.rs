//! HTTP-layer tests driving the router directly with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use crate::tests::app::create_app;
use crate::tests::stubs::{FailingTranslator, StubEmbedder, StubTranslator};
use crate::web::{resolve_port, router};

fn test_router() -> Router {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree", "phone", "flight", "travel", "trip"])),
        Arc::new(StubTranslator::new("hello world")),
    );
    router(Arc::new(app))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

fn post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_always_ok() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(test_router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nudge_empty_summary() {
    let (status, body) = send(test_router(), post("/nudge_theme", r#"{"summary": "  "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], serde_json::Value::Null);
    assert_eq!(body["similarity"], 0.0);
    assert_eq!(body["nudge"], serde_json::Value::Null);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nudge_matches_theme() {
    let (status, body) = send(
        test_router(),
        post("/nudge_theme", r#"{"summary": "planning a flight, a trip, some travel"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "travel");
    assert!(body["nudge"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_body_treated_as_empty() {
    let (status, body) = send(test_router(), post("/nudge_theme", "not json {{{")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], serde_json::Value::Null);

    let (status, body) = send(test_router(), post("/semantic_suggestions", "]]]")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_suggestions_empty_query() {
    let (status, body) = send(
        test_router(),
        post("/semantic_suggestions", r#"{"query": ""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_suggestions_rank_default_catalog() {
    let (status, body) = send(
        test_router(),
        post("/semantic_suggestions", r#"{"query": "saree"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert!(items.len() <= 5);
    assert_eq!(items[0]["name"], "Red Saree");
    // full item objects, not just names
    assert!(items[0]["tags"].is_array());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_suggestions_with_override_catalog() {
    let request_body = serde_json::json!({
        "query": "phone",
        "products": [
            {"name": "Budget Phone", "tags": ["phone"]},
            {"name": "Budget Phone", "tags": ["phone"]},
            {"name": "Silk Saree", "tags": ["saree"]}
        ]
    });

    let (status, body) = send(
        test_router(),
        post("/semantic_suggestions", &request_body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    // deduped by name, override catalog only
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Budget Phone");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_translate_empty_text() {
    let (status, body) = send(test_router(), post("/translate", r#"{"text": " "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"translation": ""}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_translate_returns_translation() {
    let (status, body) = send(test_router(), post("/translate", r#"{"text": "नमस्ते"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"translation": "hello world"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_translate_failure_returns_structured_500() {
    let app = create_app(
        Arc::new(StubEmbedder::new(&["saree"])),
        Arc::new(FailingTranslator),
    );
    let router = router(Arc::new(app));

    let (status, body) = send(router, post("/translate", r#"{"text": "नमस्ते"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[test]
fn test_port_precedence_flag_env_config() {
    // explicit flag wins even when PORT is set
    assert_eq!(resolve_port(Some(9999), Some("8080"), 5003), 9999);
    // env var beats the config file
    assert_eq!(resolve_port(None, Some("8080"), 5003), 8080);
    // config is the fallback
    assert_eq!(resolve_port(None, None, 5003), 5003);
    // junk in the env var is ignored
    assert_eq!(resolve_port(None, Some("not-a-port"), 5003), 5003);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mistyped_products_keeps_query() {
    // a bad override must not swallow a well-formed query
    let (status, body) = send(
        test_router(),
        post(
            "/semantic_suggestions",
            r#"{"query": "saree", "products": "oops"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items[0]["name"], "Red Saree");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_fields_default_to_empty() {
    let (status, body) = send(test_router(), post("/translate", r#"{}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translation"], "");

    let (status, body) = send(test_router(), post("/semantic_suggestions", r#"{}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}
