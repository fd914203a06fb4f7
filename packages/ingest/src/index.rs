//! Index flow: reuse the cached link list or crawl a fresh one.

use std::sync::Arc;

use card_catalog_cache::CacheStore;
use card_catalog_cache::store::BlobStore;
use card_catalog_models::ItemReference;
use card_catalog_scraper::PageRenderer;
use card_catalog_scraper::crawler::CategoryCrawler;
use card_catalog_scraper::progress::ProgressCallback;

use crate::PipelineError;

/// Returns the item index, crawling only when needed.
///
/// Without `force_refresh`, a readable index cache is returned as-is. In
/// every other case the listing at `start_url` is crawled and the result
/// replaces the index cache.
///
/// # Errors
///
/// Returns [`PipelineError`] if the crawl fails or the new index cannot be
/// persisted. An unreadable cache is not an error.
pub async fn update_index<S: BlobStore>(
    cache: &CacheStore<S>,
    renderer: &mut dyn PageRenderer,
    crawler: &CategoryCrawler,
    start_url: &str,
    force_refresh: bool,
    progress: Arc<dyn ProgressCallback>,
) -> Result<Vec<ItemReference>, PipelineError> {
    if force_refresh {
        log::info!("Index refresh forced, crawling listing");
    } else {
        log::info!("Reading card list from '{}'...", cache.index_key());
        match cache.load_index() {
            Ok(index) => {
                log::info!("Using cached card list: {} links", index.len());
                progress.finish(format!("{} cached links", index.len()));
                return Ok(index);
            }
            Err(e) => log::warn!("{e}; crawling listing instead"),
        }
    }

    log::info!("Extracting card list from {start_url}...");
    let index = crawler.crawl(renderer, start_url, progress).await?;

    log::info!("Saving card list cache ({} links)...", index.len());
    cache.save_index(&index).inspect_err(|e| log::error!("{e}"))?;

    Ok(index)
}

#[cfg(test)]
mod tests {
    use card_catalog_cache::CacheError;
    use card_catalog_cache::catalog::DEFAULT_INDEX_KEY;
    use card_catalog_cache::store::MemoryBlobStore;
    use card_catalog_scraper::memory::MemoryRenderer;
    use card_catalog_scraper::progress::null_progress;

    use super::*;

    const START: &str = "https://wiki.test/wiki/Category:Cards";
    const CACHED_INDEX: &str = r#"["https://wiki.test/wiki/Kuriboh"]"#;

    fn listing() -> MemoryRenderer {
        MemoryRenderer::new().with_page(
            START,
            r#"<div id="mw-pages"><ul>
                 <li><a href="/wiki/Sangan">Sangan</a></li>
                 <li><a href="/wiki/Witch_of_the_Black_Forest">Witch</a></li>
               </ul></div>"#,
        )
    }

    async fn run(
        cache: &CacheStore<MemoryBlobStore>,
        renderer: &mut MemoryRenderer,
        force_refresh: bool,
    ) -> Result<Vec<ItemReference>, PipelineError> {
        let crawler = CategoryCrawler::default();
        update_index(cache, renderer, &crawler, START, force_refresh, null_progress()).await
    }

    #[tokio::test]
    async fn cached_index_skips_crawl() {
        let store = MemoryBlobStore::new().with_entry(DEFAULT_INDEX_KEY, CACHED_INDEX);
        let cache = CacheStore::with_default_keys(store);
        let mut renderer = listing();

        let index = run(&cache, &mut renderer, false).await.unwrap();

        assert_eq!(index, ["https://wiki.test/wiki/Kuriboh"]);
        assert!(renderer.history().is_empty());
        assert_eq!(cache.store().write_count(), 0);
    }

    #[tokio::test]
    async fn force_refresh_recrawls_and_replaces_cache() {
        let store = MemoryBlobStore::new().with_entry(DEFAULT_INDEX_KEY, CACHED_INDEX);
        let cache = CacheStore::with_default_keys(store);
        let mut renderer = listing();

        let index = run(&cache, &mut renderer, true).await.unwrap();

        assert_eq!(
            index,
            [
                "https://wiki.test/wiki/Sangan",
                "https://wiki.test/wiki/Witch_of_the_Black_Forest"
            ]
        );
        assert_eq!(cache.load_index().unwrap(), index);
        assert_eq!(cache.store().write_count(), 1);
    }

    #[tokio::test]
    async fn unparsable_cache_falls_back_to_crawl() {
        let store = MemoryBlobStore::new().with_entry(DEFAULT_INDEX_KEY, "not json");
        let cache = CacheStore::with_default_keys(store);
        let mut renderer = listing();

        let index = run(&cache, &mut renderer, false).await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(renderer.history(), [START]);
    }

    #[tokio::test]
    async fn persist_failure_is_propagated() {
        let cache = CacheStore::with_default_keys(MemoryBlobStore::read_only());
        let mut renderer = listing();

        let err = run(&cache, &mut renderer, false).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cache(CacheError::Persist { .. })));
    }

    #[tokio::test]
    async fn crawl_failure_is_propagated() {
        let cache = CacheStore::with_default_keys(MemoryBlobStore::new());
        let mut renderer = MemoryRenderer::new();

        let err = run(&cache, &mut renderer, false).await.unwrap_err();
        assert!(matches!(err, PipelineError::Scrape(_)));
        assert_eq!(cache.store().write_count(), 0);
    }
}
