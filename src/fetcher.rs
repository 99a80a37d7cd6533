//! HTTP retrieval of feed and whitelist resources.

use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::{FeedError, Result};

#[cfg(test)]
use mockall::automock;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum size per retrieved resource (10 MB)
const MAX_RESOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Retrieval collaborator.
///
/// `Ok` is the success signal and carries the body as text; any failure
/// (unreachable host, non-success status, oversized body) is an `Err`.
#[cfg_attr(test, automock)]
pub trait Retriever {
    fn retrieve(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP client for fetching lists
pub struct HttpRetriever {
    client: Client,
    max_size: usize,
}

impl HttpRetriever {
    /// Create a retriever with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hostsfeed/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::retrieval("<client>", e.to_string()))?;
        Ok(Self {
            client,
            max_size: MAX_RESOURCE_SIZE,
        })
    }
}

// Note: Default is intentionally not implemented for HttpRetriever
// because new() can fail and we want explicit error handling.

impl Retriever for HttpRetriever {
    fn retrieve(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FeedError::retrieval(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::retrieval(url, format!("HTTP {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_size {
                return Err(FeedError::retrieval(
                    url,
                    format!(
                        "Response too large: {} bytes (max: {} bytes)",
                        content_length, self.max_size
                    ),
                ));
            }
        }

        let body = response
            .text()
            .map_err(|e| FeedError::retrieval(url, format!("Failed to read response body: {}", e)))?;

        // Content-Length may be absent or wrong
        if body.len() > self.max_size {
            return Err(FeedError::retrieval(
                url,
                format!(
                    "Downloaded content too large: {} bytes (max: {} bytes)",
                    body.len(),
                    self.max_size
                ),
            ));
        }

        Ok(body)
    }
}
