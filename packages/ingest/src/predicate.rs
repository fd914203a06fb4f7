//! Staleness checks for cached records.

use card_catalog_models::CatalogRecord;

/// Error raised by an [`UpdatePredicate`] that could not decide.
#[derive(Debug, thiserror::Error)]
#[error("Update check failed for {link}: {message}")]
pub struct PredicateError {
    /// Link of the record being checked.
    pub link: String,
    /// What went wrong.
    pub message: String,
}

impl PredicateError {
    #[must_use]
    pub fn new(record: &CatalogRecord, message: impl Into<String>) -> Self {
        Self {
            link: record.link.clone(),
            message: message.into(),
        }
    }
}

/// Decides whether a cached record must be fetched again.
///
/// Returning `Ok(false)` keeps the cached record as-is. An `Err` is treated
/// the same as `Ok(true)`.
pub trait UpdatePredicate: Send + Sync {
    /// # Errors
    ///
    /// Returns [`PredicateError`] if the record cannot be judged.
    fn should_update(&self, record: &CatalogRecord) -> Result<bool, PredicateError>;
}

/// Trusts every cached record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverUpdate;

impl UpdatePredicate for NeverUpdate {
    fn should_update(&self, _record: &CatalogRecord) -> Result<bool, PredicateError> {
        Ok(false)
    }
}

/// Re-fetches every cached record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysUpdate;

impl UpdatePredicate for AlwaysUpdate {
    fn should_update(&self, _record: &CatalogRecord) -> Result<bool, PredicateError> {
        Ok(true)
    }
}

impl<F> UpdatePredicate for F
where
    F: Fn(&CatalogRecord) -> Result<bool, PredicateError> + Send + Sync,
{
    fn should_update(&self, record: &CatalogRecord) -> Result<bool, PredicateError> {
        self(record)
    }
}
