use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be tied to the exact configuration it used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchStrategy;
    use crate::extract::ExtractStrategy;
    use crate::storage::LedgerMatch;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const FULL_CONFIG: &str = r#"
[search]
base-url = "https://www.ecolab.com/sds-search"
offset-param = "first"

[[search.query]]
name = "countryCode"
value = "United States"

[pagination]
total-items = 12700
page-size = 10
concurrency-limit = 10

[fetcher]
strategy = "browser"
user-agent = "TestHarvester/1.0"
per-request-timeout = 20
render-timeout = 120
wait-selector = "a.sds-downloadBtn"
headless = false

[extract]
strategy = "pattern"
marker-class = "sds-downloadBtn"
extension = "pdf"

[output]
output-path = "ecolab-com.html"
download-dir = "PDFs"
ledger-path = "ecolab-com-links.txt"
ledger-match = "substring"
"#;

    const MINIMAL_CONFIG: &str = r#"
[search]
base-url = "https://example.com/search"

[pagination]
total-items = 100
page-size = 10
concurrency-limit = 4

[output]
output-path = "pages.html"
download-dir = "docs"
ledger-path = "links.txt"
"#;

    #[test]
    fn test_load_full_config() {
        let file = create_temp_config(FULL_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.pagination.total_items, 12700);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.pagination.concurrency_limit, 10);
        assert_eq!(config.search.query.len(), 1);
        assert_eq!(config.search.query[0].value, "United States");
        assert_eq!(config.fetcher.strategy, FetchStrategy::Browser);
        assert_eq!(config.fetcher.per_request_timeout, 20);
        assert!(!config.fetcher.headless);
        assert_eq!(config.extract.strategy, ExtractStrategy::Pattern);
        assert_eq!(config.output.ledger_match, LedgerMatch::Substring);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config(MINIMAL_CONFIG).unwrap();

        assert_eq!(config.search.offset_param, "first");
        assert!(config.search.query.is_empty());
        assert_eq!(config.fetcher.strategy, FetchStrategy::Http);
        assert_eq!(config.fetcher.per_request_timeout, 30);
        assert_eq!(config.fetcher.render_timeout, 300);
        assert_eq!(config.fetcher.wait_selector, "a.sds-downloadBtn");
        assert_eq!(config.extract.strategy, ExtractStrategy::Structural);
        assert_eq!(config.extract.marker_class, "sds-downloadBtn");
        assert_eq!(config.extract.extension, "pdf");
        assert_eq!(config.output.ledger_match, LedgerMatch::Line);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let result = parse_config("this is not valid TOML {{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = MINIMAL_CONFIG.replace("page-size = 10", "page-size = 0");
        let result = parse_config(&content);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let content = format!("{}\n[fetcher]\nstrategy = \"carrier-pigeon\"\n", MINIMAL_CONFIG);
        assert!(matches!(parse_config(&content), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
