//! Pipeline configuration.
//!
//! A [`CatalogConfig`] is read from TOML. The default configuration is
//! embedded at compile time from `config/default.toml`; a user file passed
//! on the command line replaces it, with any key it leaves out falling back
//! to the built-in default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use card_catalog_scraper::RendererConfig;
use card_catalog_scraper::crawler::ListingSelectors;
use serde::Deserialize;

use crate::record::PageSelectors;

/// The default configuration, embedded at compile time.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

const DEFAULT_START_URL: &str = "https://yugipedia.com/wiki/Category:Duel_Monsters_cards";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has mistyped values.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Everything the pipeline needs to know about where to crawl and where to
/// cache.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// First page of the category listing.
    pub start_url: String,
    /// Directory holding the cache files. Defaults to `data/cache`.
    pub cache_dir: Option<PathBuf>,
    /// File name of the index cache.
    pub index_file: String,
    /// File name of the record cache.
    pub records_file: String,
    /// Re-crawl the listing even when an index cache exists.
    pub force_refresh: bool,
    /// `User-Agent` sent with every request.
    pub user_agent: Option<String>,
    /// Pause between page loads, in milliseconds.
    pub request_delay_ms: Option<u64>,
    /// Extra request headers, from the `[headers]` table.
    pub headers: BTreeMap<String, String>,
    pub selectors: SelectorConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_owned(),
            cache_dir: None,
            index_file: card_catalog_cache::catalog::DEFAULT_INDEX_KEY.to_owned(),
            records_file: card_catalog_cache::catalog::DEFAULT_RECORDS_KEY.to_owned(),
            force_refresh: false,
            user_agent: None,
            request_delay_ms: None,
            headers: BTreeMap::new(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// Page structure the crawler and record builder look for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub listing_container_id: String,
    pub listing_link_selector: String,
    pub next_page_text: String,
    pub heading_class: String,
    pub lore_class: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let listing = ListingSelectors::default();
        let page = PageSelectors::default();
        Self {
            listing_container_id: listing.container_id,
            listing_link_selector: listing.link_selector,
            next_page_text: listing.next_page_text,
            heading_class: page.heading_class,
            lore_class: page.lore_class,
        }
    }
}

impl CatalogConfig {
    /// Parses the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the embedded file is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        parse_config_toml(DEFAULT_CONFIG_TOML)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config_toml(&contents)
    }

    /// Resolved cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        card_catalog_cache::paths::cache_dir(self.cache_dir.as_deref())
    }

    #[must_use]
    pub fn listing_selectors(&self) -> ListingSelectors {
        ListingSelectors {
            container_id: self.selectors.listing_container_id.clone(),
            link_selector: self.selectors.listing_link_selector.clone(),
            next_page_text: self.selectors.next_page_text.clone(),
        }
    }

    #[must_use]
    pub fn page_selectors(&self) -> PageSelectors {
        PageSelectors {
            heading_class: self.selectors.heading_class.clone(),
            lore_class: self.selectors.lore_class.clone(),
        }
    }

    #[must_use]
    pub fn renderer_config(&self) -> RendererConfig {
        let mut config = RendererConfig::new();
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(ms) = self.request_delay_ms {
            config = config.with_delay_ms(ms);
        }
        for (key, value) in &self.headers {
            config = config.with_header(key, value);
        }
        config
    }
}

/// Parses a TOML configuration string.
///
/// # Errors
///
/// Returns [`ConfigError::Toml`] if the string is not a valid configuration.
pub fn parse_config_toml(toml_str: &str) -> Result<CatalogConfig, ConfigError> {
    Ok(toml::from_str(toml_str)?)
}
