use crate::config::types::{Config, DownloadConfig, SelectorConfig, SessionConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_session_config(&config.session)?;
    validate_download_config(&config.download)?;
    validate_selector_config(&config.selectors)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_url must not end with '/', got '{}'",
            config.base_url
        )));
    }

    if !config.listing_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "listing_path must start with '/', got '{}'",
            config.listing_path
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the session file locations
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.credentials_path.is_empty() {
        return Err(ConfigError::Validation(
            "credentials_path cannot be empty".to_string(),
        ));
    }

    if config.cache_path.is_empty() {
        return Err(ConfigError::Validation(
            "cache_path cannot be empty".to_string(),
        ));
    }

    if config.credentials_path == config.cache_path {
        return Err(ConfigError::Validation(
            "credentials_path and cache_path must differ".to_string(),
        ));
    }

    Ok(())
}

/// Validates download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.extension.is_empty() {
        return Err(ConfigError::Validation(
            "extension cannot be empty".to_string(),
        ));
    }

    if config
        .extension
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "extension must be a bare suffix like 'pdf', got '{}'",
            config.extension
        )));
    }

    if config.print_command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "print_command cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles and the show-more text is usable
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("print_link", &config.print_link),
        ("pagination", &config.pagination),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::Validation(format!("Invalid {} selector '{}': {:?}", name, selector, e))
        })?;
    }

    if config.show_more_text.is_empty() {
        return Err(ConfigError::Validation(
            "show_more_text cannot be empty".to_string(),
        ));
    }

    Ok(())
}
