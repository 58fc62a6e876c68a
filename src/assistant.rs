// src/assistant.rs
// Prompt assembly + gateway call for the two request kinds

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ConversationConfig;
use crate::llm::{CompletionGateway, GatewayError};
use crate::prompt::{build_prompt, render_analysis_prompt};
use crate::session::Session;

/// Runs panic-log analyses and chat exchanges against one gateway
#[derive(Clone)]
pub struct Assistant {
    gateway: Arc<dyn CompletionGateway>,
    conversation: ConversationConfig,
}

impl Assistant {
    pub fn new(gateway: Arc<dyn CompletionGateway>, conversation: ConversationConfig) -> Self {
        Self {
            gateway,
            conversation,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn CompletionGateway> {
        &self.gateway
    }

    pub fn conversation(&self) -> &ConversationConfig {
        &self.conversation
    }

    /// One-shot analysis; nothing is remembered
    pub async fn analyze(&self, panic_log: &str) -> Result<String, GatewayError> {
        let prompt = render_analysis_prompt(&self.conversation.analysis_template, panic_log);
        debug!(input_chars = panic_log.chars().count(), "Analyzing panic log");

        self.gateway.complete(&prompt).await.inspect_err(|e| {
            warn!(gateway = self.gateway.name(), kind = e.kind(), "Panic log analysis failed");
        })
    }

    /// Prompt the next chat call would send for `input`
    pub fn chat_prompt(&self, session: &Session, input: &str) -> String {
        build_prompt(
            &self.conversation.chat_instruction,
            session.turns(),
            input,
            self.conversation.history_window,
            &self.conversation.labels,
        )
    }

    /// Run one exchange.
    ///
    /// On success the user turn and the reply are appended, in that order.
    /// On failure the session is left exactly as it was.
    pub async fn respond(
        &self,
        session: &mut Session,
        input: &str,
    ) -> Result<String, GatewayError> {
        let prompt = self.chat_prompt(session, input);
        debug!(
            session_id = %session.id(),
            history_turns = session.len(),
            prompt_chars = prompt.chars().count(),
            "Sending chat prompt"
        );

        match self.gateway.complete(&prompt).await {
            Ok(reply) => {
                session.append_user(input);
                session.append_assistant(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                warn!(
                    session_id = %session.id(),
                    gateway = self.gateway.name(),
                    kind = e.kind(),
                    "Chat completion failed"
                );
                Err(e)
            }
        }
    }
}
