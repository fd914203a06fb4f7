//! Paginated category listing crawler.
//!
//! A category listing shows a bounded slice of its members per page plus a
//! "next page" link while more remain. The crawler collects every member
//! link, follows that link, and stops on the first page without one.

use std::sync::Arc;

use card_catalog_models::ItemReference;

use crate::progress::ProgressCallback;
use crate::{PageQuery, PageRenderer, ScrapeError, evaluate_as};

/// Where the listing and its pagination control live on a category page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSelectors {
    /// `id` of the element wrapping the member list.
    pub container_id: String,
    /// CSS selector for member anchors inside the container.
    pub link_selector: String,
    /// Text contained in the pagination anchor.
    pub next_page_text: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container_id: "mw-pages".to_owned(),
            link_selector: "li a".to_owned(),
            next_page_text: "next page".to_owned(),
        }
    }
}

/// Walks a category listing from its first page to its last.
#[derive(Debug, Clone, Default)]
pub struct CategoryCrawler {
    selectors: ListingSelectors,
}

impl CategoryCrawler {
    #[must_use]
    pub const fn new(selectors: ListingSelectors) -> Self {
        Self { selectors }
    }

    #[must_use]
    pub const fn selectors(&self) -> &ListingSelectors {
        &self.selectors
    }

    /// Collects every member link of the listing starting at `start_url`.
    ///
    /// Links are returned in page order and are not deduplicated. There is
    /// no page limit; the crawl ends only when a page has no next-page link.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScrapeError`] raised by navigation or a query.
    /// Links gathered before the failure are discarded.
    pub async fn crawl(
        &self,
        renderer: &mut dyn PageRenderer,
        start_url: &str,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<Vec<ItemReference>, ScrapeError> {
        let links_query = PageQuery::ListingLinks {
            container_id: self.selectors.container_id.clone(),
            link_selector: self.selectors.link_selector.clone(),
        };
        let next_query = PageQuery::LinkByText {
            contains: self.selectors.next_page_text.clone(),
        };

        renderer.navigate(start_url).await?;

        let mut all_links = Vec::new();
        let mut page: u32 = 1;

        loop {
            let links: Vec<ItemReference> = evaluate_as(renderer, &links_query).await?;
            log::debug!("Listing page {page}: {} links", links.len());
            progress.inc(links.len() as u64);
            all_links.extend(links);

            let next: Option<String> = evaluate_as(renderer, &next_query).await?;
            let Some(next) = next else {
                break;
            };

            log::info!("Opening next set... {next}");
            progress.set_message(format!("Listing page {}", page + 1));
            renderer.navigate(&next).await?;
            page += 1;
        }

        log::info!(
            "Crawl complete: {} links across {page} pages",
            all_links.len()
        );
        progress.finish(format!("{} links", all_links.len()));
        Ok(all_links)
    }
}
