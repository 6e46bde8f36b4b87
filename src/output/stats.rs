//! Run statistics for the two harvest phases
//!
//! Each orchestrator fills one of these while it runs and logs it as the
//! final summary: units attempted versus units completed.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Summary of a pagination run
#[derive(Debug, Clone, PartialEq)]
pub struct PageRunStats {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Pages launched (`ceil(total_items / page_size)`)
    pub attempted: u64,

    /// Pages fetched and appended
    pub succeeded: u64,

    /// Pages whose fetch or append failed
    pub failed: u64,

    /// Bytes appended to the aggregated output
    pub bytes_appended: u64,

    pub elapsed: Duration,
}

impl PageRunStats {
    pub fn new(attempted: u64) -> Self {
        Self {
            started_at: Utc::now(),
            attempted,
            succeeded: 0,
            failed: 0,
            bytes_appended: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Pages that have finished, successfully or not
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Percentage of attempted pages that succeeded
    pub fn success_rate(&self) -> f64 {
        percentage(self.succeeded, self.attempted)
    }
}

impl fmt::Display for PageRunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pages: {} / {} succeeded ({:.1}%), {} failed, {} bytes appended in {:.1}s (started {})",
            self.succeeded,
            self.attempted,
            self.success_rate(),
            self.failed,
            self.bytes_appended,
            self.elapsed.as_secs_f64(),
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Summary of a download run
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRunStats {
    pub started_at: DateTime<Utc>,

    /// Links extracted, duplicates included
    pub links_found: u64,

    /// Links left after case-normalized dedup
    pub unique_links: u64,

    /// Documents fetched and written this run
    pub downloaded: u64,

    /// Documents skipped because the file already existed
    pub already_present: u64,

    /// Saves that failed
    pub failed: u64,

    /// Links appended to the ledger
    pub ledger_appended: u64,

    /// Links the ledger snapshot already held
    pub ledger_known: u64,

    pub elapsed: Duration,
}

impl DownloadRunStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            links_found: 0,
            unique_links: 0,
            downloaded: 0,
            already_present: 0,
            failed: 0,
            ledger_appended: 0,
            ledger_known: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Links whose document is on disk after this run
    pub fn completed(&self) -> u64 {
        self.downloaded + self.already_present
    }
}

impl Default for DownloadRunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DownloadRunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Documents: {} / {} on disk ({} downloaded, {} already present), {} failed; \
             {} links found; ledger +{} ({} known) in {:.1}s",
            self.completed(),
            self.unique_links,
            self.downloaded,
            self.already_present,
            self.failed,
            self.links_found,
            self.ledger_appended,
            self.ledger_known,
            self.elapsed.as_secs_f64()
        )
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
