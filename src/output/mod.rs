//! Output module for run summaries

mod stats;

pub use stats::{DownloadRunStats, PageRunStats};
