use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Detail pages are plain HTTP fetches. The trait seam lets the pipeline run
/// against canned documents in tests.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// The timeout bounds every detail fetch so one unresponsive page cannot
    /// stall the run.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed for {}", url))?
            .error_for_status()
            .with_context(|| format!("error status for {}", url))?;
        response
            .text()
            .await
            .with_context(|| format!("failed to read body from {}", url))
    }
}
