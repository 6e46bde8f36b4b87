//! Download orchestrator - resumable document downloads
//!
//! Reads the aggregated page content, extracts and deduplicates document
//! links, then walks them one at a time: save the document, record the link
//! in the ledger. The ledger snapshot is taken once, at the start of a run.

use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::extract::{dedup_by_key, LinkExtractor};
use crate::output::DownloadRunStats;
use crate::storage::{AppendLog, ArtifactStore, Ledger, LedgerError, LedgerMatch, SaveOutcome};
use crate::url::normalize_link;
use crate::HarvestError;

/// Drives the sequential download phase
#[derive(Debug, Clone)]
pub struct DownloadOrchestrator {
    extractor: LinkExtractor,
    store: ArtifactStore,
    ledger_match: LedgerMatch,
}

impl DownloadOrchestrator {
    pub fn new(extractor: LinkExtractor, store: ArtifactStore, ledger_match: LedgerMatch) -> Self {
        Self {
            extractor,
            store,
            ledger_match,
        }
    }

    /// Builds an orchestrator from configuration, downloading through `store`
    pub fn from_config(config: &Config, store: ArtifactStore) -> Result<Self, HarvestError> {
        let extractor = LinkExtractor::from_config(&config.extract)?;
        Ok(Self::new(extractor, store, config.output.ledger_match))
    }

    /// Downloads every document linked from the aggregated content
    ///
    /// Reading the content, loading the ledger and opening the ledger for
    /// append are fatal. Everything after that is per link: a failed save or
    /// ledger append is logged and the walk continues.
    ///
    /// # Arguments
    ///
    /// * `content_path` - Aggregated page content written by the pagination phase
    /// * `download_dir` - Flat directory receiving the documents
    /// * `ledger_path` - Newline-delimited ledger of recorded links
    pub async fn run(
        &self,
        content_path: &Path,
        download_dir: &Path,
        ledger_path: &Path,
    ) -> Result<DownloadRunStats, HarvestError> {
        let mut stats = DownloadRunStats::new();
        let start_time = Instant::now();

        let raw = tokio::fs::read(content_path)
            .await
            .map_err(|source| HarvestError::ContentRead {
                path: content_path.to_path_buf(),
                source,
            })?;
        let content = String::from_utf8_lossy(&raw);

        let found = self.extractor.extract(&content);
        stats.links_found = found.len() as u64;

        let links = dedup_by_key(found, |link| normalize_link(link));
        stats.unique_links = links.len() as u64;

        tracing::info!(
            "Extracted {} links ({} unique) from {} using {:?} extraction",
            stats.links_found,
            stats.unique_links,
            content_path.display(),
            self.extractor.strategy()
        );

        let ledger = Ledger::load(ledger_path, self.ledger_match).await?;
        tracing::info!(
            "Ledger {} holds {} links",
            ledger_path.display(),
            ledger.len()
        );

        let ledger_log = AppendLog::open(ledger_path)
            .await
            .map_err(|source| HarvestError::OutputOpen {
                path: ledger_path.to_path_buf(),
                source,
            })?;

        for (position, link) in links.iter().enumerate() {
            let normalized = normalize_link(link);

            match self.store.save(link, download_dir).await {
                Ok(SaveOutcome::Saved { path, bytes }) => {
                    stats.downloaded += 1;
                    tracing::info!(
                        "[{}/{}] Saved {} ({} bytes)",
                        position + 1,
                        links.len(),
                        path.display(),
                        bytes
                    );
                }
                Ok(SaveOutcome::AlreadyPresent { path }) => {
                    stats.already_present += 1;
                    tracing::debug!(
                        "[{}/{}] Already present: {}",
                        position + 1,
                        links.len(),
                        path.display()
                    );
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!("[{}/{}] {}", position + 1, links.len(), e);
                }
            }

            if ledger.contains(&normalized) {
                stats.ledger_known += 1;
                continue;
            }

            match ledger_log.append_line(&normalized).await {
                Ok(()) => stats.ledger_appended += 1,
                Err(source) => {
                    let e = LedgerError::Append {
                        path: ledger_path.to_path_buf(),
                        source,
                    };
                    tracing::warn!("{}", e);
                }
            }
        }

        stats.elapsed = start_time.elapsed();
        tracing::info!("{}", stats);
        Ok(stats)
    }
}
