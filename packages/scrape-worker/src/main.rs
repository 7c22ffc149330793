// Main entry point for the scrape worker

use std::sync::Arc;

use anyhow::{Context, Result};
use job_extraction::ai::OpenAI;
use job_extraction::{AICredentials, ContentParser, ParserConfig, UrlValidator, AI};
use scrape_worker::{build_app, AppState, ChromiumRenderer, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,scrape_worker=debug,job_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        model = %config.openai_model,
        language = %config.default_language,
        navigation_timeout_secs = config.navigation_timeout.as_secs(),
        "Configuration loaded"
    );

    let mut credentials = AICredentials::new(config.openai_api_key.clone(), &config.openai_model);
    if let Some(base_url) = &config.openai_base_url {
        credentials = credentials.with_base_url(base_url);
    }
    if !credentials.has_key() {
        anyhow::bail!("OPENAI_API_KEY is blank");
    }
    let ai: Arc<dyn AI> = Arc::new(OpenAI::new(credentials));
    let parser = ContentParser::new(ai)
        .with_config(ParserConfig::default().with_model(&config.openai_model));

    let renderer = Arc::new(ChromiumRenderer::new(config.renderer_config()));

    let mut state = AppState::new(parser, renderer, &config.default_language);
    if config.allow_private_hosts {
        tracing::warn!("SCRAPER_ALLOW_PRIVATE_HOSTS is set, target URLs are not SSRF-checked");
        state = state.with_validator(UrlValidator::permissive());
    }

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting scrape worker on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
