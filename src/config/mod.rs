//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file the built-in defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use crossword_fetch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crossword.toml")).unwrap();
//! println!("Saving crosswords into: {}", config.download.output_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DownloadConfig, SelectorConfig, SessionConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
