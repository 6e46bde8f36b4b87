//! HTTP page fetcher
//!
//! This module handles plain network requests for result pages:
//! - Building HTTP clients with the identifying user agent
//! - Bounded per-request timeouts
//! - Treating every non-success status as a hard error

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::FetcherConfig;
use crate::crawler::PageFetcher;
use crate::FetchError;

/// Builds an HTTP client with proper configuration
///
/// Every request is bounded by `per-request-timeout`.
///
/// # Arguments
///
/// * `config` - The fetcher configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::FetcherConfig;
/// use doc_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.per_request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the HTTP client used for document downloads
///
/// Same user agent and connect timeout as [`build_http_client`], but no
/// bound on the whole request: a large document on a slow link must be able
/// to finish.
pub fn build_download_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a plain GET request
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a URL and returns its body
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused | `FetchError::Connect` |
    /// | Any non-2xx status | `FetchError::Status` |
    /// | Body read failure | `FetchError::Body` |
    /// | Other transport failure | `FetchError::Transport` |
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
