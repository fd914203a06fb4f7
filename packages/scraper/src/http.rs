//! Live renderer backed by `reqwest`.
//!
//! Fetches the raw HTML of each page and answers queries against it with
//! [`crate::dom::evaluate`]. Scripts are not executed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::{PageQuery, PageRenderer, RendererConfig, ScrapeError, dom};

/// The page most recently loaded by an [`HttpRenderer`].
#[derive(Debug)]
struct LoadedPage {
    /// Final URL after redirects, used to resolve relative links.
    url: Url,
    body: String,
}

/// Renderer that loads pages over HTTP.
#[derive(Debug)]
pub struct HttpRenderer {
    client: reqwest::Client,
    delay: Option<Duration>,
    page: Option<LoadedPage>,
    navigations: u64,
}

impl HttpRenderer {
    /// Creates a renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if a configured header is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &RendererConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: build_client(config)?,
            delay: config.delay_ms.map(Duration::from_millis),
            page: None,
            navigations: 0,
        })
    }
}

/// Builds a [`reqwest::Client`] with the configured headers.
fn build_client(config: &RendererConfig) -> Result<reqwest::Client, ScrapeError> {
    let mut header_map = reqwest::header::HeaderMap::new();
    for (key, value) in &config.headers {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ScrapeError::Parse(format!("invalid header name '{key}': {e}")))?;
        let val = reqwest::header::HeaderValue::from_str(value)
            .map_err(|e| ScrapeError::Parse(format!("invalid header value '{value}': {e}")))?;
        header_map.insert(name, val);
    }

    let mut builder = reqwest::Client::builder().default_headers(header_map);
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    builder.build().map_err(ScrapeError::Http)
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        if self.navigations > 0
            && let Some(delay) = self.delay
        {
            tokio::time::sleep(delay).await;
        }
        self.navigations += 1;

        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().clone();
        let body = response.text().await?;

        log::debug!("Loaded {final_url} ({} bytes)", body.len());
        self.page = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }

    async fn evaluate(&mut self, query: &PageQuery) -> Result<serde_json::Value, ScrapeError> {
        let page = self.page.as_ref().ok_or(ScrapeError::NoPage)?;
        dom::evaluate(&page.body, Some(&page.url), query)
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }
}
