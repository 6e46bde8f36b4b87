use url::Url;

/// Normalizes a document link for dedup and ledger comparison
///
/// Links are compared case-insensitively: the whole string is lower-cased,
/// so two links differing only in case collapse to one. Surrounding
/// whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::normalize_link;
///
/// assert_eq!(normalize_link(" https://X.com/Docs/A.PDF "), "https://x.com/docs/a.pdf");
/// ```
pub fn normalize_link(link: &str) -> String {
    link.trim().to_lowercase()
}

/// Returns true if `href` is an absolute http(s) URL with a host
///
/// Relative references, `javascript:`, `mailto:`, `data:` and other schemes
/// all return false.
pub fn is_absolute_http(href: &str) -> bool {
    match Url::parse(href.trim()) {
        Ok(url) => (url.scheme() == "http" || url.scheme() == "https") && url.host().is_some(),
        Err(_) => false,
    }
}
