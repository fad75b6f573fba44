//! Marketplace item models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace-native identifier of a listing (an ASIN on Amazon).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Resolved(String),
    /// The page did not expose an identifier for this listing.
    Unresolved,
}

impl SourceId {
    /// Build from a raw attribute value, treating blank values as unresolved.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => Self::Resolved(id.to_string()),
            _ => Self::Unresolved,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Resolved(id) => Some(id),
            Self::Unresolved => None,
        }
    }
}

/// A single listing card scraped from a search-results page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedItem {
    pub source_id: SourceId,
    pub title: String,
    /// Absolute URL of the listing, if the card had a navigable link.
    pub link: Option<String>,
    pub images: Vec<String>,
    pub raw_price_text: String,
}

/// Provenance tag linking an item to a marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSource {
    pub id: String,
    pub source: String,
}

/// Canonical item record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub link: String,
    pub images: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub sources: Vec<ItemSource>,
}

/// Fields written by an item upsert. `source_id` is the match key.
#[derive(Debug, Clone, Copy)]
pub struct ItemUpsert<'a> {
    pub source_id: &'a str,
    pub source: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub images: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_from_attr() {
        assert_eq!(
            SourceId::from_attr(Some("B0C1234XYZ")),
            SourceId::Resolved("B0C1234XYZ".to_string())
        );
        assert_eq!(SourceId::from_attr(Some("  ")), SourceId::Unresolved);
        assert_eq!(SourceId::from_attr(None), SourceId::Unresolved);
        assert_eq!(SourceId::Unresolved.as_str(), None);
    }
}
