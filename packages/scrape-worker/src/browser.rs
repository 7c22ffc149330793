//! Headless browser rendering.
//!
//! Every render launches its own browser and tears it down afterwards,
//! whether navigation succeeded or not. Nothing is shared between
//! requests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Handler, Page};
use futures::StreamExt;
use job_extraction::fetchers::DEFAULT_USER_AGENT;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::WorkerError;

/// Renders a URL to its final HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, WorkerError>;
}

/// Browser launch and navigation settings.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub user_agent: String,

    /// Upper bound for navigation, including the load event
    pub navigation_timeout: Duration,

    /// Extra wait after load for late XHR-driven content
    pub settle_delay: Duration,

    /// Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(1500),
            chrome_executable: None,
        }
    }
}

impl RendererConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl AsRef<Path>) -> Self {
        self.chrome_executable = Some(path.as_ref().to_path_buf());
        self
    }
}

/// [`PageRenderer`] backed by a local Chrome/Chromium via CDP.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    config: RendererConfig,
}

impl ChromiumRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<String, WorkerError> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = session.snapshot(url, &self.config).await;
        session.close().await;
        result
    }
}

/// One browser process and its CDP event loop.
struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    async fn launch(config: &RendererConfig) -> Result<Self, WorkerError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", config.user_agent));
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(WorkerError::Launch)?;

        let (browser, handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| WorkerError::Launch(e.to_string()))?;
        debug!("browser launched");

        Ok(Self {
            browser,
            handler_task: spawn_handler_task(handler),
        })
    }

    /// Navigate a fresh page to `url` and return `outerHTML`.
    ///
    /// The page is closed before returning on every path.
    async fn snapshot(&self, url: &str, config: &RendererConfig) -> Result<String, WorkerError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| WorkerError::Navigation(e.to_string()))?;

        let result = load_and_read(&page, url, config).await;

        if let Err(e) = page.close().await {
            debug!(error = %e, "closing page failed");
        }
        result
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "closing browser failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "waiting for browser exit failed");
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Browser kills its child process on drop; the handler loop must go too.
        self.handler_task.abort();
    }
}

async fn load_and_read(
    page: &Page,
    url: &str,
    config: &RendererConfig,
) -> Result<String, WorkerError> {
    let navigation = async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    };
    match tokio::time::timeout(config.navigation_timeout, navigation).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(WorkerError::Navigation(e.to_string())),
        Err(_) => return Err(WorkerError::Timeout(config.navigation_timeout)),
    }

    tokio::time::sleep(config.settle_delay).await;

    let html = page
        .evaluate("document.documentElement.outerHTML")
        .await
        .map_err(|e| WorkerError::Content(e.to_string()))?
        .into_value::<String>()
        .map_err(|e| WorkerError::Content(e.to_string()))?;
    debug!(url = %url, bytes = html.len(), "page rendered");

    Ok(html)
}

fn spawn_handler_task(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!(error = %e, "CDP handler event error");
            }
        }
    })
}
