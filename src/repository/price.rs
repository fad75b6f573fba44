//! Diesel-based price history repository.
//!
//! Price samples are written at most once per item per freshness window,
//! measured back from the time of the write.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::item::item_id_by_title_link;
use super::models::{NewPrice, PriceRecord};
use super::pool::{DbPool, DieselError};
use super::store::PriceStore;
use super::util::{format_timestamp, parse_datetime};
use crate::models::{PriceRecordOutcome, PriceSample};
use crate::schema::prices;

/// Default freshness window between two samples of one item.
pub const DEFAULT_FRESHNESS_WINDOW_HOURS: i64 = 12;

impl From<PriceRecord> for PriceSample {
    fn from(record: PriceRecord) -> Self {
        PriceSample {
            id: record.id,
            item_id: record.item_id,
            date: parse_datetime(&record.date),
            currency: record.currency,
            price: record.price,
        }
    }
}

/// Diesel-based price history repository.
#[derive(Clone)]
pub struct DieselPriceRepository {
    pool: DbPool,
    currency: String,
    freshness_window: Duration,
}

impl DieselPriceRepository {
    /// Create a repository writing samples in `currency`.
    pub fn new(pool: DbPool, currency: &str, freshness_window: Duration) -> Self {
        Self {
            pool,
            currency: currency.to_string(),
            freshness_window,
        }
    }

    /// Record `price` for the item with this exact title and link, unless a
    /// sample newer than the freshness window already exists.
    pub async fn record_price_if_stale(
        &self,
        title: &str,
        link: &str,
        price: f64,
    ) -> Result<PriceRecordOutcome, DieselError> {
        self.record_price_if_stale_at(title, link, price, Utc::now())
            .await
    }

    /// Same as [`record_price_if_stale`](Self::record_price_if_stale) with an
    /// explicit clock.
    pub async fn record_price_if_stale_at(
        &self,
        title: &str,
        link: &str,
        price: f64,
        now: DateTime<Utc>,
    ) -> Result<PriceRecordOutcome, DieselError> {
        let mut conn = self.pool.get().await?;

        let Some(item_id) = item_id_by_title_link(&mut conn, title, link).await? else {
            return Ok(PriceRecordOutcome::NoMatchingItem);
        };

        let window_start = format_timestamp(now - self.freshness_window);
        let fresh: i64 = prices::table
            .filter(prices::item_id.eq(&item_id))
            .filter(prices::date.gt(&window_start))
            .count()
            .get_result(&mut conn)
            .await?;

        if fresh > 0 {
            return Ok(PriceRecordOutcome::Fresh);
        }

        let date = format_timestamp(now);
        diesel::insert_into(prices::table)
            .values(NewPrice {
                item_id: &item_id,
                date: &date,
                currency: &self.currency,
                price,
            })
            .execute(&mut conn)
            .await?;

        Ok(PriceRecordOutcome::Recorded)
    }

    /// All samples for an item, newest first.
    pub async fn history(&self, item_id: &str) -> Result<Vec<PriceSample>, DieselError> {
        let mut conn = self.pool.get().await?;

        prices::table
            .filter(prices::item_id.eq(item_id))
            .order((prices::date.desc(), prices::id.desc()))
            .load::<PriceRecord>(&mut conn)
            .await
            .map(|records| records.into_iter().map(PriceSample::from).collect())
    }

    /// Most recent sample for an item.
    pub async fn latest(&self, item_id: &str) -> Result<Option<PriceSample>, DieselError> {
        let mut conn = self.pool.get().await?;

        prices::table
            .filter(prices::item_id.eq(item_id))
            .order((prices::date.desc(), prices::id.desc()))
            .first::<PriceRecord>(&mut conn)
            .await
            .optional()
            .map(|opt| opt.map(PriceSample::from))
    }
}

#[async_trait]
impl PriceStore for DieselPriceRepository {
    async fn record_price_if_stale(
        &self,
        title: &str,
        link: &str,
        price: f64,
    ) -> Result<PriceRecordOutcome, DieselError> {
        DieselPriceRepository::record_price_if_stale(self, title, link, price).await
    }
}
