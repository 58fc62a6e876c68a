// tests/common/mod.rs
// Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use panic_doctor::config::ConversationConfig;
use panic_doctor::prompt::RoleLabels;
use panic_doctor::server::{create_router, AppState};
use panic_doctor::{Assistant, CompletionGateway, GatewayError};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Gateway double that records every prompt it receives
pub struct FakeGateway {
    reply: Result<String, GatewayError>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionGateway for FakeGateway {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

/// Conversation settings with English labels so assertions stay readable
pub fn test_conversation() -> ConversationConfig {
    ConversationConfig {
        labels: RoleLabels::english(),
        chat_instruction: "You are a phone repair technician.".to_string(),
        analysis_template: "Analyze this panic log:\n{panic_log}".to_string(),
        ..Default::default()
    }
}

/// Router wired to the given fake
pub fn app_with(gateway: Arc<FakeGateway>) -> axum::Router {
    let assistant = Assistant::new(gateway, test_conversation());
    create_router(AppState::new(Some(assistant)))
}

/// Router with no gateway configured
pub fn app_without_gateway() -> axum::Router {
    create_router(AppState::uninitialized())
}

pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(
    app: axum::Router,
    uri: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
