use crate::config::types::{
    Config, ExtractConfig, FetcherConfig, OutputConfig, PaginationConfig, SearchConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_pagination_config(&config.pagination)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extract_config(&config.extract)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search endpoint
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url cannot contain a fragment: '{}'",
            config.base_url
        )));
    }

    if config.offset_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "offset-param cannot be empty".to_string(),
        ));
    }

    for param in &config.query {
        if param.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query parameter names cannot be empty".to_string(),
            ));
        }
        if param.name == config.offset_param {
            return Err(ConfigError::Validation(format!(
                "query parameter '{}' collides with offset-param",
                param.name
            )));
        }
    }

    Ok(())
}

/// Validates pagination sizing
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page-size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.concurrency_limit < 1 || config.concurrency_limit > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency-limit must be between 1 and 100, got {}",
            config.concurrency_limit
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.per_request_timeout < 1 {
        return Err(ConfigError::Validation(
            "per-request-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.render_timeout < config.per_request_timeout {
        return Err(ConfigError::Validation(format!(
            "render-timeout ({}s) must be >= per-request-timeout ({}s)",
            config.render_timeout, config.per_request_timeout
        )));
    }

    if config.wait_selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "wait-selector cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if config.marker_class.trim().is_empty() {
        return Err(ConfigError::Validation(
            "marker-class cannot be empty".to_string(),
        ));
    }

    if config.extension.is_empty() || !config.extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "extension must be non-empty and alphanumeric (no leading dot), got '{}'",
            config.extension
        )));
    }

    Ok(())
}

/// Validates output locations
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("output-path", &config.output_path),
        ("download-dir", &config.download_dir),
        ("ledger-path", &config.ledger_path),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.output_path == config.ledger_path {
        return Err(ConfigError::Validation(
            "output-path and ledger-path must differ".to_string(),
        ));
    }

    Ok(())
}
