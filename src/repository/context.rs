//! Entry point to the price database: schema setup, health check, and the
//! item and price repositories sharing one connection factory.

use std::path::Path;

use chrono::Duration;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};

use super::item::DieselItemRepository;
use super::pool::{DbPool, DieselError};
use super::price::DieselPriceRepository;

/// Database context that owns the connection factory and hands out
/// repositories.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("sqlite:prices.db");
/// ctx.init_schema().await?;
/// let id = ctx.items().upsert(&upsert).await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a new database context from a file path.
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: DbPool::from_path(db_path),
        }
    }

    /// Open a context from a `DATABASE_URL` value.
    ///
    /// Accepts `sqlite:path/to/db.sqlite`, `sqlite://path`, or a bare path.
    pub fn from_url(database_url: &str) -> Self {
        Self {
            pool: DbPool::new(database_url),
        }
    }

    /// Get the underlying connection factory.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get an item repository.
    pub fn items(&self) -> DieselItemRepository {
        DieselItemRepository::new(self.pool.clone())
    }

    /// Get a price history repository writing in `currency`.
    pub fn prices(&self, currency: &str, freshness_window: Duration) -> DieselPriceRepository {
        DieselPriceRepository::new(self.pool.clone(), currency, freshness_window)
    }

    /// Open a connection and run a trivial query.
    pub async fn ping(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        let _: Vec<NameRow> = diesel::sql_query("SELECT 'ok' AS name")
            .load(&mut conn)
            .await?;
        Ok(())
    }

    /// Create the tables if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DieselError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                link TEXT NOT NULL,
                images TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS item_sources (
                source_id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                item_id TEXT NOT NULL,
                FOREIGN KEY (item_id) REFERENCES items(id)
            );

            CREATE TABLE IF NOT EXISTS prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id TEXT NOT NULL,
                date TEXT NOT NULL,
                currency TEXT NOT NULL,
                price DOUBLE NOT NULL,
                FOREIGN KEY (item_id) REFERENCES items(id)
            );

            CREATE INDEX IF NOT EXISTS idx_items_title_link ON items(title, link);
            CREATE INDEX IF NOT EXISTS idx_item_sources_item ON item_sources(item_id);
            CREATE INDEX IF NOT EXISTS idx_prices_item_date ON prices(item_id, date);
            "#,
        )
        .await
    }

    /// Names of the user tables, sorted.
    pub async fn list_tables(&self) -> Result<Vec<String>, DieselError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<NameRow> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .load(&mut conn)
        .await?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }
}

#[derive(diesel::QueryableByName)]
struct NameRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
}
