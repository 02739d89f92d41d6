//! Crossword Fetch: downloads printable crosswords from a members-only puzzle club
//!
//! This crate authenticates against the puzzle site with a persisted cookie jar,
//! walks the paginated search listing, and saves every printable document it finds.

pub mod config;
pub mod crawler;
pub mod prompt;
pub mod query;
pub mod session;

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrosswordError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("Couldn't get crosswords from {url}: HTTP {status}")]
    Fetch { url: String, status: StatusCode },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Cannot derive a file name from {url}")]
    FileName { url: String },

    #[error("Cookie store error: {0}")]
    CookieStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Credential file errors
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Failed to access credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credentials YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing or empty cookie '{0}' in credentials")]
    Missing(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrosswordError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler};
pub use query::SearchQuery;
pub use session::Session;
