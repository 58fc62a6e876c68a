// src/llm/mod.rs
// Completion gateway - the only seam through which the remote model is reached

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiGateway;

/// Classified failure of a remote completion call.
///
/// Every variant carries text that is safe to show to an end user: the
/// credential never appears in it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response blocked: {0}")]
    Blocked(String),
}

impl GatewayError {
    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "network",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::Authentication(_) => "authentication",
            GatewayError::RateLimited(_) => "rate_limited",
            GatewayError::Api { .. } => "api",
            GatewayError::MalformedResponse(_) => "malformed_response",
            GatewayError::Blocked(_) => "blocked",
        }
    }
}

/// Sends a finished prompt to a generative model and returns its text.
///
/// Handlers and the interactive session only ever see this trait, so a
/// fake can stand in for the real model in tests.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Forward `prompt` unmodified and return the model's text output
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}
