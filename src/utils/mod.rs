//! Shared utility functions.
//!
//! - `price`: price extraction from listing text

mod price;

pub use price::{parse_price, PriceParseError};
