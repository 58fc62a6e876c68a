//! Configuration for panic-doctor
//!
//! Values resolve in this order: CLI flags, environment variables (both
//! handled by clap in `main`), `~/.panic-doctor/config.toml`, defaults.
//! The resolved [`AppConfig`] is built once at startup and never mutated.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

use crate::prompt::{RoleLabels, DEFAULT_ANALYSIS_TEMPLATE, DEFAULT_CHAT_INSTRUCTION};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HISTORY_WINDOW: usize = 10;
pub const DEFAULT_MAX_STORED_TURNS: usize = 200;

/// Contents of the optional TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    pub gemini_model: Option<String>,

    /// Override for the Gemini REST endpoint
    pub gemini_base_url: Option<String>,

    /// Remote call timeout
    pub request_timeout_secs: Option<u64>,

    pub host: Option<String>,
    pub port: Option<u16>,

    /// Number of prior turns included in a chat prompt
    pub history_window: Option<usize>,

    /// Turns kept by an interactive session; 0 keeps everything
    pub max_stored_turns: Option<usize>,

    /// Where exported chat logs are written
    pub data_dir: Option<PathBuf>,

    /// Instruction template for `/analyze`, with a `{panic_log}` placeholder
    pub analysis_template: Option<String>,

    /// System instruction for chat prompts
    pub chat_instruction: Option<String>,

    /// Role labels and section separator
    pub labels: Option<RoleLabels>,
}

impl FileConfig {
    /// Load config from ~/.panic-doctor/config.toml
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path, falling back to defaults on any problem
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Remote model settings
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

// The key must never reach logs
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Prompt assembly and history settings
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    pub history_window: usize,
    pub max_stored_turns: Option<usize>,
    pub labels: RoleLabels,
    pub analysis_template: String,
    pub chat_instruction: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            max_stored_turns: Some(DEFAULT_MAX_STORED_TURNS),
            labels: RoleLabels::default(),
            analysis_template: DEFAULT_ANALYSIS_TEMPLATE.to_string(),
            chat_instruction: DEFAULT_CHAT_INSTRUCTION.to_string(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub server: ServerConfig,
    pub conversation: ConversationConfig,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Merge overrides over the file config over defaults
    pub fn resolve(overrides: ConfigOverrides, file: FileConfig) -> Self {
        let api_key = overrides
            .gemini_api_key
            .or(file.gemini_api_key)
            .filter(|k| !k.trim().is_empty());

        let gemini = GeminiConfig {
            api_key,
            model: overrides
                .gemini_model
                .or(file.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: overrides
                .gemini_base_url
                .or(file.gemini_base_url)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout_secs: overrides
                .request_timeout_secs
                .or(file.request_timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        let server = ServerConfig {
            host: overrides
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
        };

        let defaults = ConversationConfig::default();
        let conversation = ConversationConfig {
            history_window: file.history_window.unwrap_or(defaults.history_window),
            max_stored_turns: match file.max_stored_turns {
                Some(0) => None,
                Some(cap) => Some(cap),
                None => defaults.max_stored_turns,
            },
            labels: file.labels.unwrap_or(defaults.labels),
            analysis_template: file.analysis_template.unwrap_or(defaults.analysis_template),
            chat_instruction: file.chat_instruction.unwrap_or(defaults.chat_instruction),
        };

        Self {
            gemini,
            server,
            conversation,
            data_dir: file.data_dir.unwrap_or_else(default_data_dir),
        }
    }
}

/// Base directory for the config file, .env and exports
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".panic-doctor")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}
