//! Page retrieval and search-results extraction.

mod http_client;
pub mod search;

pub use http_client::{resolve_user_agent, HttpFetcher, USER_AGENT};
pub use search::{SearchPage, SearchPageParser};

use async_trait::async_trait;

/// Errors from fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Retrieves the raw HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
