// src/server/state.rs
// Web server state

use crate::assistant::Assistant;
use crate::error::Error;

/// Shared application state.
///
/// Built once at startup and read-only afterwards. `assistant` is `None`
/// when no credential was configured; model endpoints then answer 503.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Option<Assistant>,
}

impl AppState {
    pub fn new(assistant: Option<Assistant>) -> Self {
        Self { assistant }
    }

    /// State with no model gateway
    pub fn uninitialized() -> Self {
        Self { assistant: None }
    }

    pub fn gemini_initialized(&self) -> bool {
        self.assistant.is_some()
    }

    /// The assistant, or the configuration error to report
    pub fn require_assistant(&self) -> Result<&Assistant, Error> {
        self.assistant
            .as_ref()
            .ok_or_else(|| Error::missing_credential("GEMINI_API_KEY"))
    }
}
