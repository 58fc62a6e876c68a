// src/session.rs
// In-memory conversation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Gemini calls this role "model"
    #[serde(alias = "model")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Serialized form of a session written by [`Session::save_json`]
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionExport {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub exported_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

/// Ordered turns of a single conversation.
///
/// Grows only by appending. With a cap set, the oldest turns are evicted so
/// at most `max_turns` are stored; the prompt window is applied separately
/// when the prompt is built.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    turns: VecDeque<Turn>,
    max_turns: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Unbounded session
    pub fn new() -> Self {
        Self::with_capacity_limit(None)
    }

    pub fn with_capacity_limit(max_turns: Option<usize>) -> Self {
        Self {
            id: generate_session_id(),
            created_at: Utc::now(),
            turns: VecDeque::new(),
            max_turns,
        }
    }

    /// Seed an unbounded session with turns supplied by a client
    pub fn from_turns(turns: impl IntoIterator<Item = Turn>) -> Self {
        let mut session = Self::new();
        session.turns.extend(turns);
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }

    /// All stored turns, oldest first
    pub fn turns(&self) -> std::collections::vec_deque::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.push(Turn::user(text));
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.push(Turn::assistant(text));
    }

    /// Discard every turn
    pub fn reset(&mut self) {
        debug!(session_id = %self.id, discarded = self.turns.len(), "Session reset");
        self.turns.clear();
    }

    /// Snapshot of all turns, not windowed
    pub fn export(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Write the session to `path` as pretty JSON, creating parent directories
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let export = SessionExport {
            session_id: self.id.clone(),
            created_at: self.created_at,
            exported_at: Utc::now(),
            turns: self.export(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&export)?)?;

        debug!(session_id = %self.id, path = %path.display(), "Session exported");
        Ok(())
    }

    /// Default export file name for this session
    pub fn export_file_name(&self) -> String {
        format!("chat_{}.json", self.id)
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        if let Some(cap) = self.max_turns {
            while self.turns.len() > cap {
                self.turns.pop_front();
            }
        }
    }
}

/// Generates a new random session ID (UUID v4)
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}
