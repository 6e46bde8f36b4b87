//! doc-harvest: paginated search scraping and resumable document downloads
//!
//! This crate fetches every page of a paginated search endpoint under a
//! concurrency cap, aggregates the raw markup into one file, extracts
//! document links from it and downloads each document exactly once across
//! repeated runs.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for doc-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Save error: {0}")]
    Save(#[from] storage::SaveError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] storage::LedgerError),

    #[error("Failed to read aggregated content {}: {source}", path.display())]
    ContentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open output {}: {source}", path.display())]
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("No usable file name in URL: {0}")]
    EmptyFileName(String),
}

/// Errors produced while fetching a result page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Browser error while rendering {url}: {message}")]
    Browser { url: String, message: String },

    #[error("Marker '{selector}' never became visible on {url}")]
    MarkerTimeout { url: String, selector: String },

    #[error("Rendering {url} exceeded {seconds}s")]
    RenderTimeout { url: String, seconds: u64 },

    #[error("Fetch of {url} was cancelled before admission")]
    Cancelled { url: String },
}

impl FetchError {
    /// Classifies a reqwest transport error for the given URL
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect { url, source: error }
        } else {
            FetchError::Transport { url, source: error }
        }
    }
}

/// Result type alias for doc-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{DownloadOrchestrator, PageFetcher, PaginationOrchestrator, PaginationPlan};
pub use extract::{dedup, ExtractStrategy, LinkExtractor};
pub use storage::{AppendLog, ArtifactStore, Ledger, LedgerMatch};
