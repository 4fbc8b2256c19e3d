use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Downloads a whole response body as text.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl TextFetcher for Client {
    // Non-success statuses are not errors here: a parseable body is still usable.
    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let text = resp
            .text()
            .await
            .with_context(|| format!("Can't read the body of {url}"))?;

        Ok(text)
    }
}
