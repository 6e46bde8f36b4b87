//! Link extraction and deduplication
//!
//! This module turns aggregated page markup into the ordered list of
//! document links to download:
//! - Structural extraction of marked download anchors (preferred)
//! - Pattern-match fallback over raw text
//! - Stable, order-preserving dedup

mod dedup;
mod pattern;
mod structural;

pub use dedup::{dedup, dedup_by_key};
pub use pattern::PatternExtractor;
pub use structural::StructuralExtractor;

use serde::Deserialize;

use crate::config::ExtractConfig;
use crate::ConfigError;

/// Which extraction strategy to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStrategy {
    /// Parse the markup and require the marker class
    #[default]
    Structural,
    /// Match `href="...ext"` in raw text, no marker required
    Pattern,
}

/// Best-effort document link extractor
///
/// Extraction never fails: content without matches yields an empty list.
#[derive(Debug, Clone)]
pub enum LinkExtractor {
    Structural(StructuralExtractor),
    Pattern(PatternExtractor),
}

impl LinkExtractor {
    /// Creates an extractor for the given strategy
    ///
    /// # Arguments
    ///
    /// * `strategy` - Structural or pattern matching
    /// * `marker_class` - Class required on anchors (structural only)
    /// * `extension` - Document extension without the leading dot
    pub fn new(
        strategy: ExtractStrategy,
        marker_class: &str,
        extension: &str,
    ) -> Result<Self, ConfigError> {
        match strategy {
            ExtractStrategy::Structural => Ok(Self::Structural(StructuralExtractor::new(
                marker_class,
                extension,
            ))),
            ExtractStrategy::Pattern => PatternExtractor::new(extension)
                .map(Self::Pattern)
                .map_err(|e| ConfigError::Validation(format!("Invalid extension pattern: {}", e))),
        }
    }

    /// Creates an extractor from the `[extract]` configuration section
    pub fn from_config(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Self::new(config.strategy, &config.marker_class, &config.extension)
    }

    /// Returns the strategy this extractor applies
    pub fn strategy(&self) -> ExtractStrategy {
        match self {
            Self::Structural(_) => ExtractStrategy::Structural,
            Self::Pattern(_) => ExtractStrategy::Pattern,
        }
    }

    /// Extracts absolute document URLs in document order
    pub fn extract(&self, content: &str) -> Vec<String> {
        match self {
            Self::Structural(extractor) => extractor.extract(content),
            Self::Pattern(extractor) => extractor.extract(content),
        }
    }
}
