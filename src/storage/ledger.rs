//! Snapshot of previously recorded links
//!
//! The ledger file is newline-delimited and append-only. A download run
//! reads it once at start and consults that snapshot for every link.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use crate::storage::{LedgerError, LedgerResult};
use crate::url::normalize_link;

/// How ledger membership is decided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMatch {
    /// Exact membership in the set of ledger lines
    #[default]
    Line,
    /// Containment anywhere in the ledger text
    ///
    /// Also reports true for a link that is a textual prefix or infix of a
    /// longer recorded link.
    Substring,
}

/// In-memory snapshot of the ledger file
#[derive(Debug, Clone)]
pub struct Ledger {
    text: String,
    lines: HashSet<String>,
    mode: LedgerMatch,
}

impl Ledger {
    /// Builds a snapshot from raw ledger text
    ///
    /// Recorded links are case-normalized, so callers must look up
    /// normalized links as well.
    pub fn from_text(text: impl Into<String>, mode: LedgerMatch) -> Self {
        let text = text.into().to_lowercase();
        let lines = text
            .lines()
            .map(normalize_link)
            .filter(|line| !line.is_empty())
            .collect();
        Self { text, lines, mode }
    }

    /// Reads the whole ledger file
    ///
    /// A missing file is an empty ledger; any other read failure is an error.
    pub async fn load(path: &Path, mode: LedgerMatch) -> LedgerResult<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Self::from_text(
                String::from_utf8_lossy(&bytes).into_owned(),
                mode,
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::from_text("", mode)),
            Err(source) => Err(LedgerError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Returns true if `link` was already recorded when the snapshot was taken
    pub fn contains(&self, link: &str) -> bool {
        match self.mode {
            LedgerMatch::Line => self.lines.contains(link),
            LedgerMatch::Substring => self.text.contains(link),
        }
    }

    /// Number of distinct recorded links
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mode(&self) -> LedgerMatch {
        self.mode
    }
}
