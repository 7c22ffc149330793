use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use job_extraction::security::SecretString;

use crate::browser::RendererConfig;

/// Worker configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: SecretString,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub default_language: String,
    pub navigation_timeout: Duration,
    pub user_agent: Option<String>,
    pub chrome_executable: Option<PathBuf>,
    pub allow_private_hosts: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?
                .into(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            default_language: env::var("SCRAPER_DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "zh".to_string()),
            navigation_timeout: Duration::from_secs(
                env::var("SCRAPER_NAVIGATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("SCRAPER_NAVIGATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            user_agent: env::var("SCRAPER_USER_AGENT").ok(),
            chrome_executable: env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from),
            allow_private_hosts: env::var("SCRAPER_ALLOW_PRIVATE_HOSTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Browser settings derived from this config.
    pub fn renderer_config(&self) -> RendererConfig {
        let mut renderer = RendererConfig::default().with_navigation_timeout(self.navigation_timeout);
        if let Some(user_agent) = &self.user_agent {
            renderer = renderer.with_user_agent(user_agent);
        }
        if let Some(path) = &self.chrome_executable {
            renderer = renderer.with_chrome_executable(path);
        }
        renderer
    }
}
