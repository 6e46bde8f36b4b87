//! Pagination orchestrator - bounded fan-out over result pages
//!
//! This module drives the page-fetching phase:
//! - Computing the page plan from the item count and page size
//! - Launching one task per page behind a semaphore admission gate
//! - Appending successful pages to the shared output under its lock
//! - Joining every task before reporting the run summary

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::PaginationConfig;
use crate::crawler::PageFetcher;
use crate::output::PageRunStats;
use crate::storage::AppendLog;
use crate::url::PageUrlTemplate;
use crate::{ConfigError, FetchError};

/// One result page to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub index: u64,

    /// Result offset (`index * page_size`)
    pub offset: u64,
}

/// Outcome of fetching one page
#[derive(Debug)]
pub struct PageResult {
    pub index: u64,
    pub url: String,
    pub outcome: Result<String, FetchError>,
}

/// Final state of one page task, reported back to the orchestrator
#[derive(Debug)]
enum PageReport {
    Appended { index: u64, url: String, bytes: usize },
    FetchFailed { index: u64, error: FetchError },
    AppendFailed { index: u64, url: String, error: std::io::Error },
}

/// Page count and offsets for a paginated result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlan {
    total_items: u64,
    page_size: u64,
}

impl PaginationPlan {
    /// Creates a plan; `page_size` must be at least 1
    pub fn new(total_items: u64, page_size: u64) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::Validation(
                "page-size must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            total_items,
            page_size,
        })
    }

    pub fn from_config(config: &PaginationConfig) -> Result<Self, ConfigError> {
        Self::new(config.total_items, config.page_size)
    }

    /// `ceil(total_items / page_size)`
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.page_size)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Every page request, in index order
    pub fn requests(&self) -> impl Iterator<Item = PageRequest> {
        let page_size = self.page_size;
        (0..self.total_pages()).map(move |index| PageRequest {
            index,
            offset: index * page_size,
        })
    }
}

/// Drives the concurrent page-fetching phase
pub struct PaginationOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    template: PageUrlTemplate,
    concurrency_limit: usize,
}

impl PaginationOrchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page fetching strategy shared by every task
    /// * `template` - Builds the URL for each offset
    /// * `concurrency_limit` - Capacity of the admission gate (at least 1)
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        template: PageUrlTemplate,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            fetcher,
            template,
            concurrency_limit: concurrency_limit.max(1),
        }
    }

    /// Fetches every page of `plan` and appends the successful ones to `output`
    ///
    /// Exactly `plan.total_pages()` tasks are launched. At most
    /// `concurrency_limit` of them are past admission at any instant; each
    /// holds its permit while fetching and appending and gives it back when
    /// it finishes, whatever the outcome. A failed page is logged and
    /// skipped. Returns only after every task has been joined. Pages land
    /// in `output` in completion order.
    pub async fn run(&self, plan: &PaginationPlan, output: Arc<AppendLog>) -> PageRunStats {
        let total_pages = plan.total_pages();
        let mut stats = PageRunStats::new(total_pages);
        let start_time = Instant::now();

        tracing::info!(
            "Fetching {} pages with {} (concurrency {}) into {}",
            total_pages,
            self.fetcher.name(),
            self.concurrency_limit,
            output.path().display()
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut tasks = JoinSet::new();

        for request in plan.requests() {
            let url = self.template.url_for(request.offset);
            let semaphore = semaphore.clone();
            let fetcher = self.fetcher.clone();
            let output = output.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return PageReport::FetchFailed {
                            index: request.index,
                            error: FetchError::Cancelled { url },
                        }
                    }
                };

                tracing::debug!("Fetching page {} ({})", request.index + 1, url);
                let result = PageResult {
                    index: request.index,
                    outcome: fetcher.fetch(&url).await,
                    url,
                };
                settle(result, &output).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(PageReport::Appended { index, url, bytes }) => {
                    stats.succeeded += 1;
                    stats.bytes_appended += bytes as u64;
                    tracing::debug!("Page {} appended ({} bytes) from {}", index + 1, bytes, url);
                }
                Ok(PageReport::FetchFailed { index, error }) => {
                    stats.failed += 1;
                    tracing::warn!("Skipping page {}: {}", index + 1, error);
                }
                Ok(PageReport::AppendFailed { index, url, error }) => {
                    stats.failed += 1;
                    tracing::warn!(
                        "Page {} from {} fetched but not appended to {}: {}",
                        index + 1,
                        url,
                        output.path().display(),
                        error
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("Page task aborted: {}", e);
                }
            }

            let completed = stats.completed();
            if completed % 10 == 0 && completed < total_pages {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} / {} pages done, {} failed, {:.2} pages/sec",
                    completed,
                    total_pages,
                    stats.failed,
                    rate
                );
            }
        }

        stats.elapsed = start_time.elapsed();
        tracing::info!("{}", stats);
        stats
    }
}

/// Appends a successful page to the shared output
async fn settle(result: PageResult, output: &AppendLog) -> PageReport {
    match result.outcome {
        Ok(content) => match output.append(content.as_bytes()).await {
            Ok(()) => PageReport::Appended {
                index: result.index,
                url: result.url,
                bytes: content.len(),
            },
            Err(error) => PageReport::AppendFailed {
                index: result.index,
                url: result.url,
                error,
            },
        },
        Err(error) => PageReport::FetchFailed {
            index: result.index,
            error,
        },
    }
}
