//! VPC documentation assistant.
//!
//! `serve` runs the chat page and query endpoint; `chat` talks to a running
//! server from the terminal.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vpc_docs_assistant::assistant::ChatCompletionsAssistant;
use vpc_docs_assistant::chat::{HttpTransport, terminal};
use vpc_docs_assistant::config::{AppConfig, Cli, Command, load_llm_settings};
use vpc_docs_assistant::server;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so the terminal chat owns stdout.
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Arc::new(AppConfig::load_from_cli(&cli)?);

    match cli.command.unwrap_or_default() {
        Command::Serve => {
            let settings = match load_llm_settings() {
                Ok(s) => s,
                Err(msg) => {
                    eprintln!("Configuration error: {msg}");
                    std::process::exit(1);
                }
            };

            info!(
                name: "llm.config.loaded",
                base_url = %settings.base_url,
                model = %settings.model,
                "LLM configuration loaded"
            );

            let assistant = Arc::new(ChatCompletionsAssistant::new(settings));
            server::start_server(config, assistant).await
        }
        Command::Chat => {
            let transport = Arc::new(HttpTransport::new(&config.client.endpoint)?);
            info!(
                name: "chat.session.started",
                endpoint = %transport.endpoint(),
                "Chat session started"
            );
            terminal::run_stdio(transport).await?;
            Ok(())
        }
    }
}
