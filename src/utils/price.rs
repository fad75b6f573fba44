//! Price extraction from free-form listing text.

use std::sync::LazyLock;

use regex::Regex;

/// First decimal number in scan order. Thousands separators break the match
/// on purpose: "1,299.99" yields 299.99.
static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("decimal pattern is valid"));

/// Errors from price text parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceParseError {
    #[error("no price found in text: {0:?}")]
    NotFound(String),
}

/// Parse the first `<digits>.<digits>` occurrence in `text` as a price.
pub fn parse_price(text: &str) -> Result<f64, PriceParseError> {
    DECIMAL_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| PriceParseError::NotFound(text.to_string()))
}
