//! Category crawl loop.
//!
//! One worker walks one category at a time: page 1 decides how many pages
//! the cycle has, every page is fetched in order, then a new category is
//! selected. Fetch and store failures are logged and skipped; nothing inside
//! the loop stops it.

mod categories;
mod processor;
mod state;

pub use categories::{CategoryList, CategoryProvider};
pub use processor::{PageOutcome, PageProcessor};
pub use state::{CrawlState, CycleSummary, Transition};

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::models::PageRef;
use crate::scrapers::PageFetcher;

/// Drives category cycles over a page fetcher.
pub struct Crawler<F, C> {
    fetcher: F,
    categories: C,
    processor: PageProcessor,
    base_url: String,
    page_delay: Duration,
}

impl<F: PageFetcher, C: CategoryProvider> Crawler<F, C> {
    pub fn new(fetcher: F, categories: C, processor: PageProcessor, base_url: &str) -> Self {
        Self {
            fetcher,
            categories,
            processor,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive page fetches.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Crawl until the process is stopped.
    pub async fn run(&mut self) {
        loop {
            self.run_cycle().await;
            self.pause().await;
        }
    }

    /// Crawl `cycles` categories, or forever when `None`. Returns the number
    /// of completed cycles.
    pub async fn run_cycles(&mut self, cycles: Option<u64>) -> u64 {
        let Some(limit) = cycles else {
            self.run().await;
            return 0;
        };

        for completed in 0..limit {
            if completed > 0 {
                self.pause().await;
            }
            self.run_cycle().await;
        }
        limit
    }

    /// Select a category and walk all of its pages.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let category = self.categories.next_category();
        info!("Starting category: {}", category);

        let mut state = CrawlState::new(category);
        loop {
            let page = state.page_ref();
            let outcome = self.visit(&page).await;
            state = state.observe(&outcome);
            info!(
                "{}: page {}/{} ({} listings, {} saved, {} new prices)",
                state.category,
                state.current_page,
                state.total_pages,
                outcome.cards_found,
                outcome.items_persisted,
                outcome.prices_recorded
            );

            state = match state.advance(Utc::now()) {
                Transition::NextPage(next) => next,
                Transition::CycleComplete(summary) => {
                    info!(
                        "Finished {} at {}: {} pages, {} items",
                        summary.category,
                        summary.finished_at.to_rfc3339(),
                        summary.pages_visited,
                        summary.items_seen
                    );
                    return summary;
                }
            };
            self.pause().await;
        }
    }

    /// Fetch and process one page. A failed fetch counts as an empty page.
    async fn visit(&self, page: &PageRef) -> PageOutcome {
        let url = page.search_url(&self.base_url);
        match self.fetcher.fetch(&url).await {
            Ok(html) => self.processor.process(page, &html).await,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                PageOutcome::default()
            }
        }
    }

    async fn pause(&self) {
        if !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
    }
}
