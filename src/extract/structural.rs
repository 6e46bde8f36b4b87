//! Structural link extraction
//!
//! Parses the markup and walks `<a>` elements in document order, keeping
//! those that carry the marker class and point at a document with the
//! target extension.

use scraper::{Html, Selector};

use crate::url::is_absolute_http;

/// Extracts marked download anchors from parsed markup
#[derive(Debug, Clone)]
pub struct StructuralExtractor {
    marker_class: String,
    suffix: String,
}

impl StructuralExtractor {
    /// Creates an extractor for anchors whose class contains `marker_class`
    /// and whose href ends in `.extension` (case-insensitive)
    pub fn new(marker_class: &str, extension: &str) -> Self {
        Self {
            marker_class: marker_class.to_string(),
            suffix: format!(".{}", extension.to_ascii_lowercase()),
        }
    }

    /// Returns matching absolute hrefs in document order
    ///
    /// # Link Rules
    ///
    /// **Include:** `<a>` elements whose `class` attribute contains the
    /// marker and whose `href` ends with the extension, in any case.
    ///
    /// **Exclude:** anchors without the marker, relative hrefs (dropped, not
    /// resolved), and non-http(s) schemes.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);
        let mut links = Vec::new();

        let Ok(anchor_selector) = Selector::parse("a[href]") else {
            return links;
        };

        for element in document.select(&anchor_selector) {
            let element = element.value();

            let is_marked = element
                .attr("class")
                .map_or(false, |class| class.contains(&self.marker_class));
            if !is_marked {
                continue;
            }

            if let Some(href) = element.attr("href") {
                let href = href.trim();
                if href.to_ascii_lowercase().ends_with(&self.suffix) && is_absolute_http(href) {
                    links.push(href.to_string());
                }
            }
        }

        links
    }
}
