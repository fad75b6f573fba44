//! Price history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable price observation for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub id: i32,
    pub item_id: String,
    pub date: DateTime<Utc>,
    pub currency: String,
    pub price: f64,
}

/// What a freshness-gated price write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRecordOutcome {
    /// A new sample was inserted.
    Recorded,
    /// A sample inside the freshness window already exists.
    Fresh,
    /// No item matches the title and link yet.
    NoMatchingItem,
}

impl PriceRecordOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Fresh => "fresh",
            Self::NoMatchingItem => "no_matching_item",
        }
    }
}
