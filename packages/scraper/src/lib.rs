#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page rendering boundary and generic extraction for the card catalog.
//!
//! Everything that touches a rendered page goes through the
//! [`PageRenderer`] trait: the host navigates, then sends a serialisable
//! [`PageQuery`] and receives a plain [`serde_json::Value`] back. Two
//! renderers are provided: [`http::HttpRenderer`] for live pages and
//! [`memory::MemoryRenderer`] for pre-loaded pages.
//!
//! On top of that boundary sit the table extractor and field resolver
//! ([`tables`]) and the paginated listing crawler ([`crawler`]).

pub mod crawler;
pub mod dom;
pub mod http;
pub mod memory;
pub mod progress;
pub mod renderer;
pub mod tables;

use std::collections::BTreeMap;

pub use renderer::{PageQuery, PageRenderer, evaluate_as};

/// Errors that can occur while rendering or querying a page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed (including non-success status codes).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The renderer could not load the requested URL.
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// The URL that failed to load.
        url: String,
        /// Why it failed.
        message: String,
    },

    /// A query was evaluated before any page was loaded.
    #[error("No page loaded")]
    NoPage,

    /// An element the query requires is not on the page.
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// A selector or other query argument could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A query result did not have the expected shape.
    #[error("Could not decode {query} result: {source}")]
    Decode {
        /// Name of the query whose result failed to decode.
        query: &'static str,
        /// The underlying deserialisation error.
        source: serde_json::Error,
    },
}

/// Configuration for [`http::HttpRenderer`].
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    /// `User-Agent` header sent with every request.
    pub user_agent: Option<String>,
    /// Additional HTTP headers to include in requests.
    pub headers: BTreeMap<String, String>,
    /// Delay in milliseconds before every navigation after the first.
    pub delay_ms: Option<u64>,
}

impl RendererConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_owned());
        self
    }

    /// Adds an HTTP header to include in requests.
    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Sets the delay between navigations.
    #[must_use]
    pub const fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }
}
