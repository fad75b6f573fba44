//! Search page processing: extraction, price parsing, persistence.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{ExtractedItem, ItemUpsert, PageRef, PriceRecordOutcome};
use crate::repository::{ItemStore, PriceStore};
use crate::scrapers::{SearchPage, SearchPageParser};
use crate::utils::parse_price;

/// Counts from processing one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub cards_found: usize,
    /// Cards whose item upsert succeeded.
    pub items_persisted: usize,
    pub prices_recorded: usize,
    /// Page count for the category, reported from page 1 only.
    pub total_pages: Option<u32>,
}

/// Routes each listing on a page through price parsing and both stores.
pub struct PageProcessor {
    parser: SearchPageParser,
    items: Arc<dyn ItemStore>,
    prices: Arc<dyn PriceStore>,
    source: String,
}

impl PageProcessor {
    /// `source` is the provenance tag written with new items.
    pub fn new(
        parser: SearchPageParser,
        items: Arc<dyn ItemStore>,
        prices: Arc<dyn PriceStore>,
        source: &str,
    ) -> Self {
        Self {
            parser,
            items,
            prices,
            source: source.to_string(),
        }
    }

    /// Process the fetched HTML of `page`. Store failures are logged and
    /// never abort the page.
    pub async fn process(&self, page: &PageRef, html: &str) -> PageOutcome {
        let SearchPage { cards, total_pages } = self.parser.parse(html);

        let mut outcome = PageOutcome {
            cards_found: cards.len(),
            total_pages: if page.page == 1 { total_pages } else { None },
            ..PageOutcome::default()
        };

        for card in &cards {
            self.process_card(card, &mut outcome).await;
        }

        outcome
    }

    async fn process_card(&self, card: &ExtractedItem, outcome: &mut PageOutcome) {
        let price = match parse_price(&card.raw_price_text) {
            Ok(price) => price,
            Err(e) => {
                debug!("Skipping '{}': {}", card.title, e);
                return;
            }
        };

        // Sharing a placeholder id would merge unrelated listings.
        let Some(source_id) = card.source_id.as_str() else {
            debug!("Skipping '{}': listing has no source id", card.title);
            return;
        };

        let Some(link) = card.link.as_deref() else {
            debug!("Skipping '{}': listing has no link", card.title);
            return;
        };

        let upsert = ItemUpsert {
            source_id,
            source: &self.source,
            title: &card.title,
            link,
            images: &card.images,
        };
        match self.items.upsert_item(&upsert).await {
            Ok(_) => outcome.items_persisted += 1,
            Err(e) => warn!("Failed to save item {}: {}", source_id, e),
        }

        // Independent of the upsert result: a miss here is a benign no-op.
        match self
            .prices
            .record_price_if_stale(&card.title, link, price)
            .await
        {
            Ok(PriceRecordOutcome::Recorded) => outcome.prices_recorded += 1,
            Ok(other) => debug!("Price for {} not recorded: {}", source_id, other.as_str()),
            Err(e) => warn!("Failed to save price for {}: {}", source_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSelectors;
    use crate::repository::{DbContext, DieselError};
    use async_trait::async_trait;
    use chrono::Duration;
    use tempfile::tempdir;

    const PAGE: &str = r#"
        <div data-asin="B0KETTLE01">
          <div class="a-section a-spacing-base">
            <a class="a-link-normal s-no-outline" href="/dp/B0KETTLE01">k</a>
            <img class="s-image" src="https://m.media-amazon.com/images/I/k.jpg">
            <span class="a-size-base-plus a-color-base a-text-normal">Kettle</span>
            <span class="a-offscreen">R499.99</span>
          </div>
        </div>
        <div data-asin="B0TOASTER1">
          <div class="a-section a-spacing-base">
            <a class="a-link-normal s-no-outline" href="/dp/B0TOASTER1">t</a>
            <span class="a-size-base-plus a-color-base a-text-normal">Toaster</span>
            <span class="a-offscreen">Currently unavailable</span>
          </div>
        </div>
        <div>
          <div class="a-section a-spacing-base">
            <a class="a-link-normal s-no-outline" href="/dp/NOASIN">n</a>
            <span class="a-size-base-plus a-color-base a-text-normal">Mystery</span>
            <span class="a-offscreen">R10.00</span>
          </div>
        </div>
        <span class="s-pagination-item s-pagination-disabled">4</span>
    "#;

    async fn setup() -> (DbContext, PageProcessor, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("test.db"));
        ctx.init_schema().await.unwrap();
        let parser =
            SearchPageParser::new(&SearchSelectors::default(), "https://www.amazon.co.za")
                .unwrap();
        let processor = PageProcessor::new(
            parser,
            Arc::new(ctx.items()),
            Arc::new(ctx.prices("zar", Duration::hours(12))),
            "amazon",
        );
        (ctx, processor, dir)
    }

    #[tokio::test]
    async fn test_process_first_page() {
        let (ctx, processor, _dir) = setup().await;

        let outcome = processor.process(&PageRef::new("kitchen", 1), PAGE).await;

        assert_eq!(outcome.cards_found, 3);
        assert_eq!(outcome.items_persisted, 1);
        assert_eq!(outcome.prices_recorded, 1);
        assert_eq!(outcome.total_pages, Some(4));

        let item = ctx.items().find_by_source("B0KETTLE01").await.unwrap().unwrap();
        assert_eq!(item.link, "https://www.amazon.co.za/dp/B0KETTLE01");
        let history = ctx
            .prices("zar", Duration::hours(12))
            .history(&item.id)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, 499.99);

        // Unparsable price and missing id are skipped entirely.
        assert!(ctx.items().find_by_source("B0TOASTER1").await.unwrap().is_none());
        assert_eq!(ctx.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_later_pages_do_not_report_total() {
        let (_ctx, processor, _dir) = setup().await;

        let outcome = processor.process(&PageRef::new("kitchen", 2), PAGE).await;

        assert_eq!(outcome.total_pages, None);
        assert_eq!(outcome.items_persisted, 1);
    }

    #[tokio::test]
    async fn test_reprocessing_within_window_records_no_new_price() {
        let (_ctx, processor, _dir) = setup().await;

        processor.process(&PageRef::new("kitchen", 1), PAGE).await;
        let outcome = processor.process(&PageRef::new("kitchen", 1), PAGE).await;

        assert_eq!(outcome.items_persisted, 1);
        assert_eq!(outcome.prices_recorded, 0);
    }

    #[tokio::test]
    async fn test_card_without_link_is_skipped() {
        let (ctx, processor, _dir) = setup().await;
        let page = r#"
            <div data-asin="B0NOLINK01">
              <div class="a-section a-spacing-base">
                <a class="a-link-normal s-no-outline">no href</a>
                <span class="a-size-base-plus a-color-base a-text-normal">Milk Frother</span>
                <span class="a-offscreen">R259.00</span>
              </div>
            </div>
        "#;

        let outcome = processor.process(&PageRef::new("kitchen", 1), page).await;

        assert_eq!(outcome.cards_found, 1);
        assert_eq!(outcome.items_persisted, 0);
        assert_eq!(outcome.prices_recorded, 0);
        assert!(ctx.items().find_by_source("B0NOLINK01").await.unwrap().is_none());
        assert_eq!(ctx.items().count().await.unwrap(), 0);
        let samples: i64 = {
            use crate::schema::prices;
            use diesel::prelude::*;
            use diesel_async::RunQueryDsl;
            let mut conn = ctx.pool().get().await.unwrap();
            prices::table.count().get_result(&mut conn).await.unwrap()
        };
        assert_eq!(samples, 0);
    }

    struct FailingItems;

    #[async_trait]
    impl ItemStore for FailingItems {
        async fn upsert_item(&self, _item: &ItemUpsert<'_>) -> Result<String, DieselError> {
            Err(DieselError::NotFound)
        }
    }

    #[tokio::test]
    async fn test_item_failure_does_not_block_price() {
        let (ctx, _processor, _dir) = setup().await;
        // The item already exists from an earlier crawl.
        ctx.items()
            .upsert(&ItemUpsert {
                source_id: "B0KETTLE01",
                source: "amazon",
                title: "Kettle",
                link: "https://www.amazon.co.za/dp/B0KETTLE01",
                images: &[],
            })
            .await
            .unwrap();
        let parser =
            SearchPageParser::new(&SearchSelectors::default(), "https://www.amazon.co.za")
                .unwrap();
        let processor = PageProcessor::new(
            parser,
            Arc::new(FailingItems),
            Arc::new(ctx.prices("zar", Duration::hours(12))),
            "amazon",
        );

        let outcome = processor.process(&PageRef::new("kitchen", 1), PAGE).await;

        assert_eq!(outcome.items_persisted, 0);
        assert_eq!(outcome.prices_recorded, 1);
    }
}
