//! Retrieval of extension sources by URL.
//!
//! The host only ever needs "GET this URL, hand me the text". Fetchers report
//! transport failures as errors and return non-success responses as-is; it is
//! up to the caller to decide what a non-2xx status means.

use crate::error::{RuntimeError, RuntimeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Response to a source request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
    pub status: u16,
    pub body: String,
}

impl FetchedSource {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-success response into an error.
    pub fn into_success(self, url: &str) -> RuntimeResult<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(RuntimeError::HttpStatus {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

/// Retrieves extension source text.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> RuntimeResult<FetchedSource>;
}

/// HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Create a fetcher with the default timeout.
    pub fn new() -> RuntimeResult<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> RuntimeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RuntimeError::Fetch {
                url: String::new(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> RuntimeResult<FetchedSource> {
        debug!("Fetching extension source from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RuntimeError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP request failed: {}", e),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| RuntimeError::Fetch {
            url: url.to_string(),
            reason: format!("Failed to read response: {}", e),
        })?;

        Ok(FetchedSource { status, body })
    }
}

/// In-memory fetcher serving a fixed set of URLs.
///
/// Unknown URLs fail the same way an unreachable host would.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    sources: HashMap<String, FetchedSource>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 at `url`.
    pub fn with_source(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.sources.insert(url.into(), FetchedSource::ok(body));
        self
    }

    /// Serve an arbitrary response at `url`.
    pub fn with_response(mut self, url: impl Into<String>, response: FetchedSource) -> Self {
        self.sources.insert(url.into(), response);
        self
    }
}

#[async_trait]
impl SourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> RuntimeResult<FetchedSource> {
        self.sources
            .get(url)
            .cloned()
            .ok_or_else(|| RuntimeError::Fetch {
                url: url.to_string(),
                reason: "no source registered for URL".to_string(),
            })
    }
}
