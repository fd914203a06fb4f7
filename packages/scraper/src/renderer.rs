//! The page rendering capability.
//!
//! A renderer holds exactly one loaded page at a time. Callers move it with
//! [`PageRenderer::navigate`] and read from it with
//! [`PageRenderer::evaluate`], which takes a [`PageQuery`] descriptor and
//! answers with plain JSON. Neither side shares memory with the other, so a
//! renderer backed by an out-of-process browser fits the same trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ScrapeError;

/// A query to run against the currently loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum PageQuery {
    /// Absolute `href`s of every `link_selector` match inside the element
    /// with id `container_id`. Answers an array of strings; fails when the
    /// container is absent.
    ListingLinks {
        /// `id` attribute of the listing container.
        container_id: String,
        /// CSS selector for anchors within the container.
        link_selector: String,
    },
    /// Absolute `href` of the first anchor whose text contains `contains`.
    /// Answers a string or `null`.
    LinkByText {
        /// Substring to look for in anchor text.
        contains: String,
    },
    /// Every `<table>` on the page as a
    /// [`card_catalog_models::TableMatrix`], in document order.
    Tables,
    /// Text of the first element carrying `class_name`. Answers a string or
    /// `null`.
    FirstText {
        /// Class name to match.
        class_name: String,
    },
}

impl PageQuery {
    /// Short name used in logs and decode errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListingLinks { .. } => "listing_links",
            Self::LinkByText { .. } => "link_by_text",
            Self::Tables => "tables",
            Self::FirstText { .. } => "first_text",
        }
    }
}

/// A single rendering session.
///
/// Implementations are driven strictly sequentially; every call completes
/// before the next is issued.
#[async_trait]
pub trait PageRenderer: Send {
    /// Loads `url`, replacing the current page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the page cannot be loaded.
    async fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Runs `query` against the current page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if no page is loaded or the query fails.
    async fn evaluate(&mut self, query: &PageQuery) -> Result<serde_json::Value, ScrapeError>;

    /// URL of the currently loaded page, if any.
    fn current_url(&self) -> Option<&str>;
}

/// Runs `query` and decodes its answer into `T`.
///
/// # Errors
///
/// Returns [`ScrapeError`] if evaluation fails or the answer does not
/// decode as `T`.
pub async fn evaluate_as<T: DeserializeOwned>(
    renderer: &mut dyn PageRenderer,
    query: &PageQuery,
) -> Result<T, ScrapeError> {
    let value = renderer.evaluate(query).await?;
    serde_json::from_value(value).map_err(|source| ScrapeError::Decode {
        query: query.name(),
        source,
    })
}
