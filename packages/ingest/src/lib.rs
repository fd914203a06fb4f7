#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incremental card catalog ingestion.
//!
//! [`run_pipeline`] chains the two cache flows: the index flow
//! ([`index::update_index`]) yields every card link, and the record flow
//! ([`reconcile::update_records`]) fetches whatever the record cache is
//! missing or the [`predicate::UpdatePredicate`] rejects. Both share one
//! [`PageRenderer`] that is navigated in place, one page at a time.

pub mod config;
pub mod index;
pub mod interactive;
pub mod predicate;
pub mod reconcile;
pub mod record;

use std::sync::Arc;

use card_catalog_cache::store::BlobStore;
use card_catalog_cache::{CacheError, CacheStore};
use card_catalog_models::ItemReference;
use card_catalog_scraper::crawler::CategoryCrawler;
use card_catalog_scraper::progress::{ProgressCallback, null_progress};
use card_catalog_scraper::{PageRenderer, ScrapeError};

use crate::config::CatalogConfig;
use crate::predicate::UpdatePredicate;
use crate::reconcile::RecordSyncReport;
use crate::record::RecordBuilder;

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The listing crawl failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// A cache could not be persisted.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Progress sinks for the two phases of a run.
#[derive(Clone)]
pub struct PipelineProgress {
    pub crawl: Arc<dyn ProgressCallback>,
    pub fetch: Arc<dyn ProgressCallback>,
}

impl Default for PipelineProgress {
    fn default() -> Self {
        Self {
            crawl: null_progress(),
            fetch: null_progress(),
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The index the records were reconciled against.
    pub index: Vec<ItemReference>,
    pub records: RecordSyncReport,
}

/// Opens the cache described by `config` on top of `store`.
#[must_use]
pub fn open_cache<S: BlobStore>(config: &CatalogConfig, store: S) -> CacheStore<S> {
    CacheStore::new(store, &config.index_file, &config.records_file)
}

/// Runs the index flow followed by the record flow.
///
/// A fetch failure inside the record flow does not fail the run; it is
/// reported in [`RecordSyncReport::aborted`] after the partial result has
/// been persisted.
///
/// # Errors
///
/// Returns [`PipelineError`] if the listing crawl fails or either cache
/// cannot be written.
pub async fn run_pipeline<S: BlobStore>(
    config: &CatalogConfig,
    renderer: &mut dyn PageRenderer,
    cache: &CacheStore<S>,
    predicate: &dyn UpdatePredicate,
    progress: PipelineProgress,
) -> Result<PipelineOutcome, PipelineError> {
    let crawler = CategoryCrawler::new(config.listing_selectors());
    let index = index::update_index(
        cache,
        renderer,
        &crawler,
        &config.start_url,
        config.force_refresh,
        progress.crawl,
    )
    .await?;

    let builder = RecordBuilder::new(config.page_selectors());
    let records =
        reconcile::update_records(cache, renderer, &builder, &index, predicate, progress.fetch)
            .await?;

    log::info!(
        "Catalog holds {} record(s) ({} retained, {} fetched)",
        records.records.len(),
        records.retained,
        records.fetched
    );

    Ok(PipelineOutcome { index, records })
}
