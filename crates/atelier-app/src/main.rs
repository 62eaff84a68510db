//! Atelier application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the locale resolver and the reply service (LLM client read once
//!    from the environment)
//! 4. Serve HTTP, or run the terminal chat

mod cli;
mod repl;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use atelier_api::{start_server, AppState};
use atelier_chat::{
    ChatSession, CompletionClient, GroqClient, RemoteReplyGenerator, ReplyGenerator, ReplyService,
};
use atelier_core::{AtelierConfig, Locale};
use atelier_locale::LocaleResolver;

use cli::{CliArgs, Command};

/// Strict when the file exists; defaults when it does not.
fn load_config(path: &Path) -> atelier_core::Result<AtelierConfig> {
    if path.exists() {
        AtelierConfig::load(path)
    } else {
        Ok(AtelierConfig::default())
    }
}

/// The reply service with a Groq client when an API key is present.
fn build_reply_service(config: &AtelierConfig) -> ReplyService {
    match GroqClient::from_env(&config.chat.llm) {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client configured");
            let client: Arc<dyn CompletionClient> = Arc::new(client);
            ReplyService::new(Some(client))
        }
        Err(e) => {
            tracing::warn!(
                env = %config.chat.llm.api_key_env,
                error = %e,
                "LLM client unavailable; chat replies will report the missing key"
            );
            ReplyService::new(None)
        }
    }
}

async fn serve(config: AtelierConfig) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = LocaleResolver::from_config(&config)?;
    tracing::info!(
        supported = ?resolver.supported(),
        default = %resolver.default_locale(),
        "Locale resolver ready"
    );

    let replies = build_reply_service(&config);
    let state = AppState::new(config.clone(), resolver, replies);

    tracing::info!(
        "Site at http://{}:{}/{}",
        config.server.host,
        config.server.port,
        config.locale.default
    );
    start_server(&config, state).await?;
    Ok(())
}

async fn chat(
    config: AtelierConfig,
    locale: Locale,
    server: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let generator: Arc<dyn ReplyGenerator> = match server {
        Some(url) => {
            let timeout = Duration::from_secs(config.chat.llm.timeout_secs.saturating_add(5));
            let remote = RemoteReplyGenerator::new(&url, timeout)?;
            tracing::info!(endpoint = remote.endpoint(), "Using remote chat server");
            Arc::new(remote)
        }
        None => Arc::new(build_reply_service(&config)),
    };

    repl::run(ChatSession::new(generator, locale)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = load_config(&config_file)?;
    config.server.port = args.resolve_port(config.server.port);

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Atelier v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    match args.command() {
        Command::Serve => serve(config).await,
        Command::Chat { locale, server } => chat(config, locale, server).await,
    }
}
