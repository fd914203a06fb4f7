//! In-memory renderer serving pre-registered pages.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Url;

use crate::{PageQuery, PageRenderer, ScrapeError, dom};

/// Renderer over a fixed set of `url -> html` pages.
///
/// Navigating to a URL that was never registered fails with
/// [`ScrapeError::Navigation`]. Every navigation attempt is recorded in
/// [`MemoryRenderer::history`], including failed ones.
#[derive(Debug, Default, Clone)]
pub struct MemoryRenderer {
    pages: BTreeMap<String, String>,
    current: Option<String>,
    history: Vec<String>,
}

impl MemoryRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page.
    #[must_use]
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.insert_page(url, html);
        self
    }

    /// Registers or replaces a page.
    pub fn insert_page(&mut self, url: &str, html: &str) {
        self.pages.insert(url.to_owned(), html.to_owned());
    }

    /// URLs passed to [`PageRenderer::navigate`], in call order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[async_trait]
impl PageRenderer for MemoryRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.history.push(url.to_owned());
        if !self.pages.contains_key(url) {
            return Err(ScrapeError::Navigation {
                url: url.to_owned(),
                message: "page not registered".to_owned(),
            });
        }
        self.current = Some(url.to_owned());
        Ok(())
    }

    async fn evaluate(&mut self, query: &PageQuery) -> Result<serde_json::Value, ScrapeError> {
        let url = self.current.as_deref().ok_or(ScrapeError::NoPage)?;
        let html = self.pages.get(url).ok_or(ScrapeError::NoPage)?;
        let base = Url::parse(url).ok();
        dom::evaluate(html, base.as_ref(), query)
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
