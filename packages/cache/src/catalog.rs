//! Index and record cache documents.

use card_catalog_models::{CatalogRecord, ItemReference};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheError;
use crate::store::BlobStore;

/// Default key of the index cache.
pub const DEFAULT_INDEX_KEY: &str = "card_urls.json";

/// Default key of the record cache.
pub const DEFAULT_RECORDS_KEY: &str = "card_details.json";

/// The two cache documents kept in one [`BlobStore`].
#[derive(Debug)]
pub struct CacheStore<S> {
    store: S,
    index_key: String,
    records_key: String,
}

impl<S: BlobStore> CacheStore<S> {
    #[must_use]
    pub fn new(store: S, index_key: &str, records_key: &str) -> Self {
        Self {
            store,
            index_key: index_key.to_owned(),
            records_key: records_key.to_owned(),
        }
    }

    /// Uses [`DEFAULT_INDEX_KEY`] and [`DEFAULT_RECORDS_KEY`].
    #[must_use]
    pub fn with_default_keys(store: S) -> Self {
        Self::new(store, DEFAULT_INDEX_KEY, DEFAULT_RECORDS_KEY)
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    #[must_use]
    pub fn records_key(&self) -> &str {
        &self.records_key
    }

    /// Loads the index cache.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`CacheError`] if the index is missing,
    /// unreadable, or malformed.
    pub fn load_index(&self) -> Result<Vec<ItemReference>, CacheError> {
        self.load(&self.index_key)
    }

    /// Replaces the index cache with `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Persist`] if the write fails.
    pub fn save_index(&self, index: &[ItemReference]) -> Result<(), CacheError> {
        self.save(&self.index_key, index)
    }

    /// Loads the record cache.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`CacheError`] if the record cache is missing,
    /// unreadable, or malformed.
    pub fn load_records(&self) -> Result<Vec<CatalogRecord>, CacheError> {
        self.load(&self.records_key)
    }

    /// Sorts `records` by name and replaces the record cache with them.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Persist`] if the write fails.
    pub fn save_records(&self, records: &mut [CatalogRecord]) -> Result<(), CacheError> {
        sort_records(records);
        self.save(&self.records_key, &*records)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        let contents = self
            .store
            .read(key)
            .map_err(|source| CacheError::Read {
                key: key.to_owned(),
                source,
            })?
            .ok_or_else(|| CacheError::Missing {
                key: key.to_owned(),
            })?;

        serde_json::from_str(&contents).map_err(|source| CacheError::Parse {
            key: key.to_owned(),
            source,
        })
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let contents = serde_json::to_string(value).map_err(|source| CacheError::Serialize {
            key: key.to_owned(),
            source,
        })?;

        self.store
            .write(key, &contents)
            .map_err(|source| CacheError::Persist {
                key: key.to_owned(),
                source,
            })?;

        log::debug!("Wrote {} bytes to '{key}'", contents.len());
        Ok(())
    }
}

/// Sorts records by name, byte-wise ascending. Records with equal names
/// keep their relative order.
pub fn sort_records(records: &mut [CatalogRecord]) {
    records.sort_by(|left, right| left.name.cmp(&right.name));
}
