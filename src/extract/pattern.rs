//! Pattern-match link extraction
//!
//! Degraded fallback that scans raw text for `href="<absolute-url>.<ext>"`
//! without parsing the markup or requiring the marker class.

use html_escape::decode_html_entities;
use regex::Regex;

use crate::url::is_absolute_http;

/// Regex-based extractor over raw page text
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    pattern: Regex,
}

impl PatternExtractor {
    /// Compiles the href pattern for the given extension
    pub fn new(extension: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r#"(?i)href\s*=\s*"([^"<>]+\.{})\s*""#,
            regex::escape(extension)
        ))?;
        Ok(Self { pattern })
    }

    /// Returns every matching absolute URL in order of appearance
    ///
    /// Attribute values are entity-decoded and trimmed before the absolute
    /// http(s) check, so `&amp;` in a query string comes back as `&`.
    pub fn extract(&self, content: &str) -> Vec<String> {
        self.pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| decode_html_entities(m.as_str()).trim().to_string())
            .filter(|href| is_absolute_http(href))
            .collect()
    }
}
