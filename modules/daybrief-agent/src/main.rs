use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daybrief_agent::flows;
use daybrief_agent::generate::{GeminiProvider, GenerationClient, ModelPair};
use daybrief_agent::pipeline::Pipeline;
use daybrief_agent::search::TavilySearcher;
use daybrief_agent::sinks::{DiscordSink, NotionSink};
use daybrief_common::Config;
use gemini_client::GeminiClient;
use tavily_client::TavilyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("daybrief=info".parse()?))
        .init();

    info!("Daybrief agent starting...");

    // Load config
    let config = Config::from_env();
    config.log_redacted();

    // One shared HTTP client for every collaborator.
    let http = reqwest::Client::new();

    let searcher = Arc::new(TavilySearcher::new(TavilyClient::new(
        config.tavily_api_key.clone(),
        http.clone(),
    )));
    let provider = Arc::new(GeminiProvider::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        http.clone(),
    )));
    let generator = GenerationClient::new(
        provider,
        ModelPair {
            primary: config.primary_model.clone(),
            secondary: config.secondary_model.clone(),
        },
    );
    let notifier = Arc::new(DiscordSink::new(
        config.discord_webhook_url.clone(),
        http.clone(),
    ));
    let persister = Arc::new(NotionSink::new(
        config.notion_api_key.clone(),
        config.notion_database_id.clone(),
        http,
    ));

    let pipeline = Pipeline::new(searcher, generator, notifier, persister);

    let summary = pipeline.run_all(&flows::daily_flows()).await;
    info!(
        published = summary.published,
        skipped = summary.skipped,
        failed = summary.failed,
        "Daily job complete"
    );

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
