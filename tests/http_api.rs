// tests/http_api.rs
// Router-level tests against a fake gateway

mod common;

use axum::http::StatusCode;
use common::{app_with, app_without_gateway, get_json, post_json, post_raw, FakeGateway};
use panic_doctor::GatewayError;
use serde_json::json;

// ============================================================================
// Info endpoints
// ============================================================================

#[tokio::test]
async fn root_lists_endpoints() {
    let (status, body) = get_json(app_without_gateway(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "POST /analyze"));
    assert!(endpoints.iter().any(|e| e == "POST /chat"));
}

#[tokio::test]
async fn health_reports_gateway_state() {
    let (status, body) = get_json(app_without_gateway(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "gemini_initialized": false}));

    let (status, body) = get_json(app_with(FakeGateway::replying("x")), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gemini_initialized"], true);
}

#[tokio::test]
async fn ping_is_alive() {
    let (status, body) = get_json(app_without_gateway(), "/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "alive"}));
}

// ============================================================================
// /analyze
// ============================================================================

#[tokio::test]
async fn analyze_returns_model_text() {
    let reply = "Lỗi cảm biến nhiệt độ pin, kiểm tra cáp sạc.";
    let gateway = FakeGateway::replying(reply);
    let log = "panic(cpu 0 caller 0xfffffff0): thermalmonitord timeout";

    let (status, body) =
        post_json(app_with(gateway.clone()), "/analyze", json!({"panic_log": log})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["analysis"], reply);
    assert_eq!(body["input_length"], log.chars().count());
    assert_eq!(gateway.calls(), 1);
    assert!(gateway.last_prompt().unwrap().contains(log));
}

#[tokio::test]
async fn analyze_counts_characters_not_bytes() {
    let gateway = FakeGateway::replying("ok");
    let log = "máy sập nguồn";

    let (_, body) = post_json(app_with(gateway), "/analyze", json!({"panic_log": log})).await;

    assert_eq!(body["input_length"], 13);
}

#[tokio::test]
async fn analyze_rejects_blank_log_without_calling_gateway() {
    for log in ["", "   ", "\n\t "] {
        let gateway = FakeGateway::replying("should not be used");
        let (status, body) =
            post_json(app_with(gateway.clone()), "/analyze", json!({"panic_log": log})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "log {:?}", log);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error_code"], "BAD_REQUEST");
        assert_eq!(gateway.calls(), 0);
    }
}

#[tokio::test]
async fn analyze_rejects_missing_field_and_bad_json() {
    let gateway = FakeGateway::replying("unused");

    let (status, _) = post_json(app_with(gateway.clone()), "/analyze", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        post_raw(app_with(gateway.clone()), "/analyze", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn analyze_without_gateway_is_unavailable() {
    let (status, body) =
        post_json(app_without_gateway(), "/analyze", json!({"panic_log": "panic"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn analyze_blank_log_without_gateway_is_still_bad_request() {
    let (status, _) = post_json(app_without_gateway(), "/analyze", json!({"panic_log": " "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_gateway_failure_is_500_with_cause() {
    let gateway = FakeGateway::failing(GatewayError::RateLimited("quota exhausted".to_string()));

    let (status, body) =
        post_json(app_with(gateway), "/analyze", json!({"panic_log": "panic"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "GATEWAY_ERROR");
    assert!(body["error"].as_str().unwrap().contains("quota exhausted"));
}

// ============================================================================
// /chat
// ============================================================================

#[tokio::test]
async fn chat_answers_and_echoes_message() {
    let gateway = FakeGateway::replying("Hãy thử sạc pin 30 phút.");

    let (status, body) = post_json(
        app_with(gateway.clone()),
        "/chat",
        json!({"message": "máy vẫn không lên nguồn"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "response": "Hãy thử sạc pin 30 phút.",
            "message": "máy vẫn không lên nguồn"
        })
    );
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn chat_prompt_ends_with_history_then_message() {
    let gateway = FakeGateway::replying("ok");

    let (status, _) = post_json(
        app_with(gateway.clone()),
        "/chat",
        json!({
            "message": "máy vẫn không lên nguồn",
            "history": [
                {"role": "user", "content": "pin mở máy"},
                {"role": "assistant", "content": "thử sạc pin"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let prompt = gateway.last_prompt().unwrap();
    assert!(prompt.starts_with("You are a phone repair technician.\nConversation:\n"));
    assert!(prompt.ends_with(
        "User: pin mở máy\nAssistant: thử sạc pin\nUser: máy vẫn không lên nguồn"
    ));
}

#[tokio::test]
async fn chat_includes_only_last_ten_turns() {
    let gateway = FakeGateway::replying("ok");
    let history: Vec<_> = (0..14)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "model" };
            json!({"role": role, "content": format!("turn-{:02}", i)})
        })
        .collect();

    post_json(
        app_with(gateway.clone()),
        "/chat",
        json!({"message": "latest", "history": history}),
    )
    .await;

    let prompt = gateway.last_prompt().unwrap();
    for i in 0..4 {
        assert!(!prompt.contains(&format!("turn-{:02}", i)));
    }
    let included: Vec<&str> = prompt.lines().filter(|l| l.contains("turn-")).collect();
    assert_eq!(included.len(), 10);
    assert_eq!(included[0], "User: turn-04");
    assert_eq!(included[9], "Assistant: turn-13");
}

#[tokio::test]
async fn chat_accepts_null_history() {
    let gateway = FakeGateway::replying("ok");
    let (status, _) = post_json(
        app_with(gateway),
        "/chat",
        json!({"message": "hello", "history": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn chat_rejects_empty_message() {
    let gateway = FakeGateway::replying("unused");
    let (status, body) =
        post_json(app_with(gateway.clone()), "/chat", json!({"message": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("message"));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn chat_rejects_unknown_role() {
    let gateway = FakeGateway::replying("unused");
    let (status, _) = post_json(
        app_with(gateway.clone()),
        "/chat",
        json!({"message": "hi", "history": [{"role": "system", "content": "x"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn chat_without_gateway_is_unavailable() {
    let (status, _) = post_json(app_without_gateway(), "/chat", json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn chat_network_fault_is_500_referencing_fault() {
    let gateway =
        FakeGateway::failing(GatewayError::Network("connection reset by peer".to_string()));

    let (status, body) = post_json(app_with(gateway), "/chat", json!({"message": "hi"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("network error"));
    assert!(error.contains("connection reset by peer"));
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn cors_allows_any_origin() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let response = app_without_gateway()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze")
                .header("origin", "https://example.github.io")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
