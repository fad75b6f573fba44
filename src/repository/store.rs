//! Storage traits consumed by the page processor.
//!
//! The crawler only needs these two writes; keeping them behind traits lets
//! the processor run against any store.

use async_trait::async_trait;

use super::pool::DieselError;
use crate::models::{ItemUpsert, PriceRecordOutcome};

/// Canonical item storage keyed by marketplace source id.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert or update the item for `item.source_id`, returning its id.
    async fn upsert_item(&self, item: &ItemUpsert<'_>) -> Result<String, DieselError>;
}

/// Freshness-gated price history storage.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Record a sample for the item matching `title` and `link` unless a
    /// fresh one already exists.
    async fn record_price_if_stale(
        &self,
        title: &str,
        link: &str,
        price: f64,
    ) -> Result<PriceRecordOutcome, DieselError>;
}
