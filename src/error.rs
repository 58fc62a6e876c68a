// src/error.rs
// Error types for panic-doctor

use thiserror::Error;

use crate::llm::GatewayError;

/// Main error type for the panic-doctor library
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Result using the crate error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Missing or unusable remote credential
    pub fn missing_credential(var: &str) -> Self {
        Error::Configuration(format!("{var} is not set; model endpoints are disabled"))
    }
}
