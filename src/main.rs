// src/main.rs
// panic-doctor - HTTP backend and interactive chat for phone panic-log analysis

use anyhow::Result;
use clap::{Parser, Subcommand};
use panic_doctor::{
    config::{self, AppConfig, ConfigOverrides, FileConfig},
    repl::Repl,
    server::{self, AppState},
    Assistant, GeminiGateway,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "panic-doctor")]
#[command(about = "Phone panic-log analysis and repair chat powered by Gemini")]
#[command(version)]
struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", global = true)]
    gemini_model: Option<String>,

    /// Gemini REST endpoint
    #[arg(long, env = "GEMINI_BASE_URL", global = true)]
    gemini_base_url: Option<String>,

    /// Remote call timeout in seconds
    #[arg(long, env = "PANIC_DOCTOR_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    /// Address to bind
    #[arg(long, env = "PANIC_DOCTOR_HOST", global = true)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Chat interactively in the terminal
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.panic-doctor/.env or current dir)
    let env_path = Some(config::default_data_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        gemini_api_key: cli.gemini_api_key,
        gemini_model: cli.gemini_model,
        gemini_base_url: cli.gemini_base_url,
        request_timeout_secs: cli.timeout_secs,
        host: cli.host,
        port: cli.port,
    };
    let config = AppConfig::resolve(overrides, FileConfig::load());

    // A missing key disables the model endpoints, not the process
    let assistant = match GeminiGateway::new(&config.gemini) {
        Ok(gateway) => {
            info!("Gemini initialized (model: {})", config.gemini.model);
            Some(Assistant::new(Arc::new(gateway), config.conversation.clone()))
        }
        Err(e) => {
            error!("Gemini not initialized: {}", e);
            None
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("History window: {} turns", config.conversation.history_window);
            server::run(&config.server.bind_address(), AppState::new(assistant)).await
        }
        Commands::Chat => {
            let Some(assistant) = assistant else {
                anyhow::bail!(
                    "GEMINI_API_KEY required (set via --gemini-api-key, env var, or {})",
                    config::config_path().display()
                );
            };
            Repl::new(assistant, config.data_dir)?.run().await
        }
    }
}
