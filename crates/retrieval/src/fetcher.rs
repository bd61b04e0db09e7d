//! Link content fetching.
//!
//! Retrieves raw page content for an ordered list of URLs. A failure on one
//! URL never aborts the run for the others: the resource is dropped and the
//! failure logged.

use linkrag_core::{AppError, AppResult};

use crate::types::FetchedResource;

/// User agent sent with every page request.
const USER_AGENT: &str = concat!("linkrag/", env!("CARGO_PKG_VERSION"));

/// HTTP fetcher for page content.
pub struct LinkFetcher {
    client: reqwest::Client,
}

impl LinkFetcher {
    /// Create a fetcher with a default HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Fetch every URL in order, keeping the resources that succeeded.
    ///
    /// Fetches run sequentially; the output preserves input order. Failed
    /// URLs are logged at `warn` and skipped.
    pub async fn fetch(&self, urls: &[String]) -> Vec<FetchedResource> {
        let mut resources = Vec::with_capacity(urls.len());

        for url in urls {
            match self.fetch_one(url).await {
                Ok(resource) => resources.push(resource),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                }
            }
        }

        tracing::info!("Fetched {}/{} URLs", resources.len(), urls.len());

        resources
    }

    /// Fetch a single URL.
    async fn fetch_one(&self, url: &str) -> AppResult<FetchedResource> {
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

        Ok(FetchedResource {
            url: url.to_string(),
            content,
        })
    }
}

impl Default for LinkFetcher {
    fn default() -> Self {
        Self::new()
    }
}
