// src/lib.rs
// panic-doctor - phone panic-log analysis and repair chat backed by Gemini

pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod repl;
pub mod server;
pub mod session;

pub use assistant::Assistant;
pub use error::{Error, Result};
pub use llm::{CompletionGateway, GatewayError, GeminiGateway};
pub use session::{Role, Session, Turn};
