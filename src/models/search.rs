//! Search page addressing.

/// One fetch: a category search at a given result page (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub category: String,
    pub page: u32,
}

impl PageRef {
    pub fn new(category: impl Into<String>, page: u32) -> Self {
        Self {
            category: category.into(),
            page,
        }
    }

    /// Search-results URL for this page on the marketplace at `base_url`.
    pub fn search_url(&self, base_url: &str) -> String {
        format!(
            "{}/s?k={}&page={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.category),
            self.page
        )
    }
}
