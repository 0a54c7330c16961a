use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::warn;

/// A rendering session: load a URL, block until `wait_for` matches in the
/// rendered document, hand back its markup. Extraction always happens
/// host-side on the returned HTML.
#[async_trait]
pub trait Render: Send + Sync {
    async fn render(&self, url: &str, wait_for: &str) -> Result<String>;
}

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Headless Chrome session held for the duration of one run.
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    wait_timeout: Duration,
}

impl ChromeRenderer {
    pub async fn launch(wait_timeout: Duration) -> Result<Self> {
        let config = BrowserConfig::builder().build().map_err(|e| anyhow!(e))?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch headless browser")?;
        // The event stream must be drained for the browser to make progress.
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });
        Ok(Self {
            browser,
            handler,
            wait_timeout,
        })
    }

    /// Shut the browser down. Called on every exit path so no Chrome process
    /// outlives the run.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("failed to close browser")?;
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl Render for ChromeRenderer {
    async fn render(&self, url: &str, wait_for: &str) -> Result<String> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("failed to open {}", url))?;

        let deadline = Instant::now() + self.wait_timeout;
        loop {
            if page.find_element(wait_for).await.is_ok() {
                break;
            }
            if Instant::now() >= deadline {
                let _ = page.close().await;
                bail!(
                    "timed out after {:?} waiting for `{}` on {}",
                    self.wait_timeout,
                    wait_for,
                    url
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        let html = page
            .content()
            .await
            .with_context(|| format!("failed to read rendered document for {}", url))?;
        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", url, e);
        }
        Ok(html)
    }
}
