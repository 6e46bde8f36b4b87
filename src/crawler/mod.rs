//! Crawler module for page fetching and document downloads
//!
//! This module contains the two harvest phases, including:
//! - The page fetching seam (plain HTTP or browser rendering)
//! - Bounded concurrent pagination into one aggregated file
//! - Sequential, resumable document downloads

#[cfg(feature = "browser")]
mod browser;
mod download;
mod fetcher;
mod pagination;

#[cfg(feature = "browser")]
pub use browser::BrowserFetcher;
pub use download::DownloadOrchestrator;
pub use fetcher::{build_download_client, build_http_client, HttpFetcher};
pub use pagination::{PageRequest, PageResult, PaginationOrchestrator, PaginationPlan};

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, FetchStrategy, FetcherConfig};
use crate::output::{DownloadRunStats, PageRunStats};
use crate::storage::{AppendLog, ArtifactStore};
use crate::url::PageUrlTemplate;
use crate::{FetchError, HarvestError};

/// Retrieves the markup of one result page
///
/// Implementations must be safe to share across concurrent page tasks.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Builds the page fetcher selected by configuration
///
/// The browser strategy is only available when the crate is built with the
/// `browser` feature; otherwise selecting it is a configuration error.
pub fn build_fetcher(config: &FetcherConfig) -> Result<Arc<dyn PageFetcher>, HarvestError> {
    match config.strategy {
        FetchStrategy::Http => Ok(Arc::new(HttpFetcher::from_config(config)?)),
        #[cfg(feature = "browser")]
        FetchStrategy::Browser => Ok(Arc::new(BrowserFetcher::from_config(config))),
        #[cfg(not(feature = "browser"))]
        FetchStrategy::Browser => Err(crate::ConfigError::Validation(
            "fetcher strategy 'browser' requires building with --features browser".to_string(),
        )
        .into()),
    }
}

/// Runs the pagination phase
///
/// Fetches every result page and appends the bodies to `output.output-path`.
/// With `fresh`, the aggregated file is truncated first; otherwise new pages
/// are appended after whatever a previous run left.
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `fresh` - Truncate the aggregated content file before fetching
pub async fn fetch_pages(config: &Config, fresh: bool) -> Result<PageRunStats, HarvestError> {
    let plan = PaginationPlan::from_config(&config.pagination)?;
    let template = PageUrlTemplate::from_config(&config.search);
    let fetcher = build_fetcher(&config.fetcher)?;

    let output_path = Path::new(&config.output.output_path);
    let opened = if fresh {
        AppendLog::open_fresh(output_path).await
    } else {
        AppendLog::open(output_path).await
    };
    let output = opened.map_err(|source| HarvestError::OutputOpen {
        path: output_path.to_path_buf(),
        source,
    })?;

    let orchestrator = PaginationOrchestrator::new(
        fetcher,
        template,
        config.pagination.concurrency_limit as usize,
    );
    Ok(orchestrator.run(&plan, Arc::new(output)).await)
}

/// Runs the download phase over the aggregated content file
pub async fn download_documents(config: &Config) -> Result<DownloadRunStats, HarvestError> {
    let store = ArtifactStore::new(build_download_client(&config.fetcher)?);
    let orchestrator = DownloadOrchestrator::from_config(config, store)?;

    orchestrator
        .run(
            Path::new(&config.output.output_path),
            Path::new(&config.output.download_dir),
            Path::new(&config.output.ledger_path),
        )
        .await
}

/// Runs both phases back to back
pub async fn harvest(
    config: &Config,
    fresh: bool,
) -> Result<(PageRunStats, DownloadRunStats), HarvestError> {
    let pages = fetch_pages(config, fresh).await?;
    let downloads = download_documents(config).await?;
    Ok((pages, downloads))
}
