//! End-to-end crawl tests.
//!
//! Drives full category cycles through the public API against a temporary
//! SQLite database, with canned search pages standing in for the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use diesel_async::RunQueryDsl;
use tempfile::tempdir;

use snapprice::config::{CategoryOrder, SearchSelectors};
use snapprice::crawler::{CategoryList, Crawler, PageProcessor};
use snapprice::models::PageRef;
use snapprice::repository::DbContext;
use snapprice::scrapers::{FetchError, PageFetcher, SearchPageParser};

const BASE: &str = "https://www.amazon.co.za";

struct CannedPages {
    pages: HashMap<String, String>,
    requested: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PageFetcher for CannedPages {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn card(asin: &str, title: &str, price: &str) -> String {
    format!(
        r#"<div class="s-result-item s-asin" data-asin="{asin}">
             <div class="a-section a-spacing-base">
               <a class="a-link-normal s-no-outline" href="/{asin}/dp/{asin}">
                 <img class="s-image" src="https://m.media-amazon.com/images/I/{asin}.jpg">
               </a>
               <h2><span class="a-size-base-plus a-color-base a-text-normal">{title}</span></h2>
               <span class="a-price"><span class="a-offscreen">{price}</span></span>
             </div>
           </div>"#
    )
}

fn results_page(cards: &[String], last_page: Option<u32>) -> String {
    let pagination = match last_page {
        Some(n) => format!(
            r#"<span class="s-pagination-item s-pagination-previous s-pagination-disabled">Previous</span>
               <span class="s-pagination-item s-pagination-selected">1</span>
               <span class="s-pagination-item s-pagination-disabled">{n}</span>"#
        ),
        None => String::new(),
    };
    format!(
        r#"<html><body><div class="s-result-list s-search-results sg-row">{}</div>{}</body></html>"#,
        cards.join("\n"),
        pagination
    )
}

fn fixture() -> HashMap<String, String> {
    let mut pages = HashMap::new();
    pages.insert(
        PageRef::new("kettles", 1).search_url(BASE),
        results_page(
            &[
                card("B0KET00001", "Glass Kettle 1.7L", "R 1,299.99"),
                card("B0KET00002", "Travel Kettle", "R249.00"),
            ],
            Some(2),
        ),
    );
    pages.insert(
        PageRef::new("kettles", 2).search_url(BASE),
        results_page(
            &[
                card("B0KET00003", "Smart Kettle", "R899.50"),
                card("B0KET00004", "Out of stock kettle", "Currently unavailable"),
            ],
            // A later page claiming more pages must not extend the cycle.
            Some(5),
        ),
    );
    pages
}

async fn setup(
    pages: HashMap<String, String>,
) -> (
    Crawler<CannedPages, CategoryList>,
    DbContext,
    Arc<Mutex<Vec<String>>>,
    tempfile::TempDir,
) {
    let dir = tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("prices.db"));
    ctx.init_schema().await.unwrap();

    let requested = Arc::new(Mutex::new(Vec::new()));
    let fetcher = CannedPages {
        pages,
        requested: requested.clone(),
    };
    let processor = PageProcessor::new(
        SearchPageParser::new(&SearchSelectors::default(), BASE).unwrap(),
        Arc::new(ctx.items()),
        Arc::new(ctx.prices("zar", Duration::hours(12))),
        "amazon",
    );
    let categories =
        CategoryList::new(vec!["kettles".to_string()], CategoryOrder::RoundRobin).unwrap();

    (
        Crawler::new(fetcher, categories, processor, BASE),
        ctx,
        requested,
        dir,
    )
}

#[tokio::test]
async fn test_full_cycle_persists_items_and_prices() {
    let (mut crawler, ctx, requested, _dir) = setup(fixture()).await;

    let summary = crawler.run_cycle().await;

    assert_eq!(summary.category, "kettles");
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.items_seen, 3);
    assert_eq!(requested.lock().unwrap().len(), 2);

    let items = ctx.items();
    assert_eq!(items.count().await.unwrap(), 3);

    let glass = items.find_by_source("B0KET00001").await.unwrap().unwrap();
    assert_eq!(glass.title, "Glass Kettle 1.7L");
    assert_eq!(glass.link, format!("{BASE}/B0KET00001/dp/B0KET00001"));
    assert_eq!(
        glass.images,
        vec!["https://m.media-amazon.com/images/I/B0KET00001.jpg".to_string()]
    );

    let prices = ctx.prices("zar", Duration::hours(12));
    let latest = prices.latest(&glass.id).await.unwrap().unwrap();
    // Thousands separators are not understood by the price parser.
    assert_eq!(latest.price, 299.99);
    assert_eq!(latest.currency, "zar");

    assert!(items.find_by_source("B0KET00004").await.unwrap().is_none());
}

#[tokio::test]
async fn test_recrawl_within_window_keeps_one_sample_per_item() {
    let (mut crawler, ctx, requested, _dir) = setup(fixture()).await;

    assert_eq!(crawler.run_cycles(Some(2)).await, 2);
    assert_eq!(requested.lock().unwrap().len(), 4);

    let items = ctx.items();
    let prices = ctx.prices("zar", Duration::hours(12));
    assert_eq!(items.count().await.unwrap(), 3);
    for asin in ["B0KET00001", "B0KET00002", "B0KET00003"] {
        let item = items.find_by_source(asin).await.unwrap().unwrap();
        assert_eq!(prices.history(&item.id).await.unwrap().len(), 1, "{asin}");
    }
}

#[derive(diesel::QueryableByName, Debug)]
struct ColumnInfo {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}

/// The DDL in `init_schema` must agree with the Diesel table definitions.
#[tokio::test]
async fn test_schema_matches_table_definitions() {
    let dir = tempdir().unwrap();
    let ctx = DbContext::new(&dir.path().join("prices.db"));
    ctx.init_schema().await.unwrap();
    let mut conn = ctx.pool().get().await.unwrap();

    let expected: [(&str, &[&str]); 3] = [
        ("items", &["id", "title", "link", "images", "updated_at"]),
        ("item_sources", &["source_id", "source", "item_id"]),
        ("prices", &["id", "item_id", "date", "currency", "price"]),
    ];

    for (table, columns) in expected {
        let rows: Vec<ColumnInfo> =
            diesel::sql_query(format!("SELECT name FROM pragma_table_info('{table}')"))
                .load(&mut conn)
                .await
                .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, columns, "{table}");
    }
}
