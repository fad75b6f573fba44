//! HTTP page fetcher built on reqwest.

mod user_agent;

pub use user_agent::{resolve_user_agent, USER_AGENT};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, PageFetcher};

/// Fetches search pages over HTTP with a fixed user agent and timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher. `user_agent` follows [`resolve_user_agent`].
    pub fn new(user_agent: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let user_agent = resolve_user_agent(user_agent);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        debug!("HTTP fetcher using user agent: {}", user_agent);
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
