#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persisted caches for the card catalog.
//!
//! Two independent JSON documents are kept in a [`store::BlobStore`]: the
//! index cache (every item link found by the last listing crawl) and the
//! record cache (every extracted [`card_catalog_models::CatalogRecord`]).
//! Both are replaced wholesale on every write.

pub mod catalog;
pub mod paths;
pub mod store;

pub use catalog::CacheStore;

/// Errors that can occur while loading or persisting a cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// No entry has been written under this key yet.
    #[error("Cache entry '{key}' not found")]
    Missing {
        /// The cache key.
        key: String,
    },

    /// The entry exists but could not be read.
    #[error("Failed to read cache entry '{key}': {source}")]
    Read {
        /// The cache key.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The entry was read but is not valid JSON of the expected shape.
    #[error("Failed to parse cache entry '{key}': {source}")]
    Parse {
        /// The cache key.
        key: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Serialising the new contents failed.
    #[error("Failed to serialise cache entry '{key}': {source}")]
    Serialize {
        /// The cache key.
        key: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Writing the new contents failed.
    #[error("Failed to persist cache entry '{key}': {source}")]
    Persist {
        /// The cache key.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl CacheError {
    /// Whether the caller can fall back to recomputing the data.
    ///
    /// Load failures are recoverable; write failures are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Missing { .. } | Self::Read { .. } | Self::Parse { .. }
        )
    }
}
