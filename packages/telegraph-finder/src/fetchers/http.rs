//! HTTP-based page fetcher.
//!
//! A plain reqwest GET: default headers, no auth, whole body read as text.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::{FinderError, ProbeError, ProbeResult, Result};
use crate::traits::fetcher::{FetchResponse, PageFetcher};

/// HTTP fetcher backed by one shared `reqwest::Client`.
///
/// The client pools connections, so one fetcher should be built per run and
/// shared by every probe of that run.
///
/// # Example
///
/// ```rust,ignore
/// use telegraph_finder::fetchers::HttpFetcher;
///
/// let fetcher = HttpFetcher::new(Some(Duration::from_secs(10)))?;
/// let response = fetcher.get("https://telegra.ph/test-01-01").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher, optionally bounding every request by `timeout`.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FinderError::Transport(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify_error(url: &str, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout {
                url: url.to_string(),
            }
        } else {
            ProbeError::Http(Box::new(err))
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> ProbeResult<FetchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify_error(url, e))?;

        let status = response.status().as_u16();
        debug!(url = %url, status = status, "probe response");

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Self::classify_error(url, e)
            } else {
                ProbeError::Body {
                    url: url.to_string(),
                    source: Box::new(e),
                }
            }
        })?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_is_probe_error() {
        let fetcher = HttpFetcher::new(Some(Duration::from_secs(2))).unwrap();

        // Port 9 (discard) on loopback is closed in test environments.
        let result = fetcher.get("http://127.0.0.1:9/test-01-01").await;
        assert!(matches!(
            result,
            Err(ProbeError::Http(_)) | Err(ProbeError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_url_is_probe_error() {
        let fetcher = HttpFetcher::new(None).unwrap();
        assert!(fetcher.get("not a url").await.is_err());
    }
}
