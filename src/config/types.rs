use serde::Deserialize;

use crate::extract::ExtractStrategy;
use crate::storage::LedgerMatch;

/// Main configuration structure for doc-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

/// Search endpoint whose result pages are fetched
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Endpoint without the offset parameter
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Name of the query parameter carrying the result offset
    #[serde(rename = "offset-param", default = "default_offset_param")]
    pub offset_param: String,

    /// Fixed query parameters, emitted in order before the offset
    #[serde(default)]
    pub query: Vec<QueryParam>,
}

/// A fixed `name=value` query parameter
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

/// Pagination and worker pool sizing
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Total number of items the search reports
    #[serde(rename = "total-items")]
    pub total_items: u64,

    /// Items per result page
    #[serde(rename = "page-size")]
    pub page_size: u64,

    /// Maximum number of page fetches in flight
    #[serde(rename = "concurrency-limit")]
    pub concurrency_limit: u32,
}

/// Which page fetching strategy to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Headless browser rendering (requires the `browser` feature)
    Browser,
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    #[serde(default)]
    pub strategy: FetchStrategy,

    /// Identifying client-agent header
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "per-request-timeout", default = "default_per_request_timeout")]
    pub per_request_timeout: u64,

    /// Upper bound on a whole browser render (seconds)
    #[serde(rename = "render-timeout", default = "default_render_timeout")]
    pub render_timeout: u64,

    /// CSS selector that must be visible before a rendered page is captured
    #[serde(rename = "wait-selector", default = "default_wait_selector")]
    pub wait_selector: String,

    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            user_agent: default_user_agent(),
            per_request_timeout: default_per_request_timeout(),
            render_timeout: default_render_timeout(),
            wait_selector: default_wait_selector(),
            headless: default_headless(),
        }
    }
}

/// Link extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub strategy: ExtractStrategy,

    /// Class carried by download anchors
    #[serde(rename = "marker-class", default = "default_marker_class")]
    pub marker_class: String,

    /// Document file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractStrategy::default(),
            marker_class: default_marker_class(),
            extension: default_extension(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Aggregated page content file
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Directory receiving downloaded documents
    #[serde(rename = "download-dir")]
    pub download_dir: String,

    /// Newline-delimited ledger of recorded links
    #[serde(rename = "ledger-path")]
    pub ledger_path: String,

    /// How ledger membership is decided
    #[serde(rename = "ledger-match", default)]
    pub ledger_match: LedgerMatch,
}

fn default_offset_param() -> String {
    "first".to_string()
}

fn default_user_agent() -> String {
    format!("doc-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_per_request_timeout() -> u64 {
    30
}

fn default_render_timeout() -> u64 {
    300
}

fn default_wait_selector() -> String {
    "a.sds-downloadBtn".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_marker_class() -> String {
    "sds-downloadBtn".to_string()
}

fn default_extension() -> String {
    "pdf".to_string()
}
