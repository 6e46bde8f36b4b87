//! Storage module for the durable state of a harvest
//!
//! This module owns everything doc-harvest writes to disk:
//! - The append-only log shared by concurrent page fetchers
//! - The ledger of previously recorded links
//! - The artifact store holding downloaded documents

mod append_log;
mod artifact;
mod ledger;

pub use append_log::AppendLog;
pub use artifact::{ArtifactStore, SaveOutcome};
pub use ledger::{Ledger, LedgerMatch};

use crate::UrlError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single artifact save
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Cannot derive a file name for {url}: {source}")]
    InvalidFileName { url: String, source: UrlError },

    #[error("Download of {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors reading or appending to the ledger file
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to append to ledger {}: {source}", path.display())]
    Append {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for artifact saves
pub type SaveResult<T> = Result<T, SaveError>;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
