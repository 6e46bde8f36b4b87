use crate::config::{QueryParam, SearchConfig};

/// Builds result-page URLs that differ only in their offset parameter
///
/// The fixed part of the URL (base, fixed query parameters and the offset
/// parameter name) is percent-encoded once at construction; spaces become
/// `%20`, never `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrlTemplate {
    prefix: String,
}

impl PageUrlTemplate {
    /// Creates a template from a base URL, fixed parameters and the offset parameter name
    ///
    /// # Example
    ///
    /// ```
    /// use doc_harvest::config::QueryParam;
    /// use doc_harvest::url::PageUrlTemplate;
    ///
    /// let template = PageUrlTemplate::new(
    ///     "https://www.ecolab.com/sds-search",
    ///     &[QueryParam { name: "countryCode".into(), value: "United States".into() }],
    ///     "first",
    /// );
    /// assert_eq!(
    ///     template.url_for(20),
    ///     "https://www.ecolab.com/sds-search?countryCode=United%20States&first=20"
    /// );
    /// ```
    pub fn new(base_url: &str, fixed: &[QueryParam], offset_param: &str) -> Self {
        let mut prefix = base_url.to_string();

        match prefix.find('?') {
            None => prefix.push('?'),
            Some(_) if prefix.ends_with('?') || prefix.ends_with('&') => {}
            Some(_) => prefix.push('&'),
        }

        for param in fixed {
            prefix.push_str(&urlencoding::encode(&param.name));
            prefix.push('=');
            prefix.push_str(&urlencoding::encode(&param.value));
            prefix.push('&');
        }

        prefix.push_str(&urlencoding::encode(offset_param));
        prefix.push('=');

        Self { prefix }
    }

    /// Creates a template from the `[search]` configuration section
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.base_url, &config.query, &config.offset_param)
    }

    /// Returns the fully-formed URL for the given result offset
    pub fn url_for(&self, offset: u64) -> String {
        format!("{}{}", self.prefix, offset)
    }
}
