//! Crawl command.

use std::sync::Arc;

use tracing::info;

use super::super::helpers::open_database;
use snapprice::config::{CategoryOrder, Settings};
use snapprice::crawler::{CategoryList, Crawler, PageProcessor};
use snapprice::scrapers::{HttpFetcher, SearchPageParser};

/// Crawl categories until stopped, or for `cycles` cycles when non-zero.
pub async fn cmd_crawl(
    settings: &Settings,
    cycles: u64,
    categories: Vec<String>,
    order: Option<CategoryOrder>,
) -> anyhow::Result<()> {
    let names = if categories.is_empty() {
        settings.categories.clone()
    } else {
        categories
    };
    let categories = CategoryList::new(names, order.unwrap_or(settings.category_order))?;
    let parser = SearchPageParser::new(&settings.selectors, &settings.base_url)?;
    let fetcher = HttpFetcher::new(settings.user_agent.as_deref(), settings.request_timeout())?;

    let ctx = open_database(settings).await?;
    let processor = PageProcessor::new(
        parser,
        Arc::new(ctx.items()),
        Arc::new(ctx.prices(&settings.currency, settings.freshness_window())),
        &settings.source,
    );

    info!(
        "Crawling {} ({} categories, {}h freshness window)",
        settings.base_url,
        categories.names().len(),
        settings.freshness_hours
    );

    let mut crawler = Crawler::new(fetcher, categories, processor, &settings.base_url)
        .with_page_delay(settings.page_delay());
    let completed = crawler.run_cycles((cycles > 0).then_some(cycles)).await;

    info!("Completed {} category cycles", completed);
    Ok(())
}
