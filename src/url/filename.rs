use crate::UrlError;
use url::Url;

/// Characters that may never appear in a derived file name
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derives the local file name for a document URL
///
/// # Derivation Steps
///
/// 1. Take the last non-empty segment of the URL path, percent-decoded
/// 2. Strip `<>:"/\|?*` and control characters
/// 3. Replace spaces with underscores
/// 4. Lower-case the result
///
/// Parentheses and other punctuation survive.
///
/// # Returns
///
/// * `Ok(String)` - A non-empty file name other than `.` or `..`
/// * `Err(UrlError)` - The URL does not parse or yields no usable name
///
/// # Examples
///
/// ```
/// use doc_harvest::url::derive_file_name;
///
/// let name = derive_file_name("https://x.com/docs/My File (v2).pdf").unwrap();
/// assert_eq!(name, "my_file_(v2).pdf");
/// ```
pub fn derive_file_name(link: &str) -> Result<String, UrlError> {
    let url = Url::parse(link).map_err(|e| UrlError::Parse(format!("{}: {}", link, e)))?;

    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| UrlError::EmptyFileName(link.to_string()))?;

    let decoded = urlencoding::decode_binary(segment.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let name: String = decoded
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect::<String>()
        .to_lowercase();

    if name.is_empty() || name == "." || name == ".." {
        return Err(UrlError::EmptyFileName(link.to_string()));
    }

    Ok(name)
}
