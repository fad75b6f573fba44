//! Data models for snapprice.

mod item;
mod price;
mod search;

pub use item::{ExtractedItem, Item, ItemSource, ItemUpsert, SourceId};
pub use price::{PriceRecordOutcome, PriceSample};
pub use search::PageRef;
