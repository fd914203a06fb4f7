//! Record flow: reconciles the record cache against the current index.
//!
//! Cached records the [`UpdatePredicate`] accepts are kept as-is. Every
//! other link in the index is fetched again, one at a time, in index order.
//! A failed fetch stops the batch, but the records gathered so far are still
//! sorted and written so the next run resumes where this one stopped.

use std::collections::BTreeSet;
use std::sync::Arc;

use card_catalog_cache::CacheStore;
use card_catalog_cache::store::BlobStore;
use card_catalog_models::{CatalogRecord, ItemReference};
use card_catalog_scraper::progress::ProgressCallback;
use card_catalog_scraper::{PageRenderer, ScrapeError};

use crate::PipelineError;
use crate::predicate::UpdatePredicate;
use crate::record::RecordBuilder;

/// The fetch that stopped a batch.
#[derive(Debug)]
pub struct FetchFailure {
    pub link: ItemReference,
    pub error: ScrapeError,
}

/// Outcome of [`update_records`].
#[derive(Debug)]
pub struct RecordSyncReport {
    /// Final records, sorted by name.
    pub records: Vec<CatalogRecord>,
    /// Cached records kept without fetching.
    pub retained: usize,
    /// Records fetched during this run.
    pub fetched: usize,
    /// Whether the record cache was rewritten.
    pub written: bool,
    /// Set when a fetch failed and the remaining links were skipped.
    pub aborted: Option<FetchFailure>,
}

impl RecordSyncReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Brings the record cache in line with `index`.
///
/// # Errors
///
/// Returns [`PipelineError::Cache`] if the updated records cannot be
/// persisted. Fetch failures do not error; they are reported through
/// [`RecordSyncReport::aborted`].
pub async fn update_records<S: BlobStore>(
    cache: &CacheStore<S>,
    renderer: &mut dyn PageRenderer,
    builder: &RecordBuilder,
    index: &[ItemReference],
    predicate: &dyn UpdatePredicate,
    progress: Arc<dyn ProgressCallback>,
) -> Result<RecordSyncReport, PipelineError> {
    let cached = match cache.load_records() {
        Ok(records) => records,
        Err(e) => {
            log::warn!("{e}; fetching every record");
            Vec::new()
        }
    };

    let (mut records, pending) = partition(cached, index, predicate);
    let retained = records.len();

    if pending.is_empty() {
        log::info!("Using cache: {retained} (skipping cache write since it is unchanged)");
        progress.finish(format!("{retained} cached"));
        return Ok(RecordSyncReport {
            records,
            retained,
            fetched: 0,
            written: false,
            aborted: None,
        });
    }

    log::info!(
        "Using cache: {retained}, fetching {} record(s)",
        pending.len()
    );
    progress.set_total(pending.len() as u64);

    let mut aborted = None;
    for link in pending {
        progress.set_message(link.clone());
        match builder.build(renderer, &link).await {
            Ok(record) => {
                records.push(record);
                progress.inc(1);
            }
            Err(error) => {
                log::error!("Failed to extract {link}: {error}");
                aborted = Some(FetchFailure { link, error });
                break;
            }
        }
    }

    let fetched = records.len() - retained;
    progress.finish(format!("{fetched} fetched"));

    log::info!("Saving {} record(s) to '{}'...", records.len(), cache.records_key());
    cache
        .save_records(&mut records)
        .inspect_err(|e| log::error!("{e}"))?;

    Ok(RecordSyncReport {
        records,
        retained,
        fetched,
        written: true,
        aborted,
    })
}

/// Splits cached records into the ones to keep and the index links still
/// to fetch.
///
/// Kept records survive even when their link has left the index. Stale
/// records are dropped; their link is fetched again only if the index still
/// lists it. Pending links are unique and in index order.
fn partition(
    cached: Vec<CatalogRecord>,
    index: &[ItemReference],
    predicate: &dyn UpdatePredicate,
) -> (Vec<CatalogRecord>, Vec<ItemReference>) {
    let mut satisfied = BTreeSet::new();
    let mut retained = Vec::with_capacity(cached.len());

    for record in cached {
        let stale = predicate.should_update(&record).unwrap_or_else(|e| {
            log::warn!("{e}; refetching");
            true
        });
        if !stale {
            satisfied.insert(record.link.clone());
            retained.push(record);
        }
    }

    let mut seen = BTreeSet::new();
    let pending = index
        .iter()
        .filter(|link| !satisfied.contains(*link) && seen.insert(link.as_str()))
        .cloned()
        .collect();

    (retained, pending)
}
