use serde::Deserialize;

/// Main configuration structure
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a working configuration for the Times puzzle club.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub session: SessionConfig,
    pub download: DownloadConfig,
    pub selectors: SelectorConfig,
}

/// The puzzle site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the site, no trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the puzzle search listing
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Re-apply the credential cookies and retry once when a GET is rejected
    #[serde(rename = "relogin-on-failure")]
    pub relogin_on_failure: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.thetimes.co.uk".to_string(),
            listing_path: "/puzzleclub/crosswordclub/puzzles-list".to_string(),
            user_agent: format!("crossword-fetch/{}", env!("CARGO_PKG_VERSION")),
            relogin_on_failure: false,
        }
    }
}

/// Where authentication state lives between runs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// YAML file holding the login cookies
    #[serde(rename = "credentials-path")]
    pub credentials_path: String,

    /// Cookie jar cache written at the end of every run
    #[serde(rename = "cache-path")]
    pub cache_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            credentials_path: ".timescrosswords.yaml".to_string(),
            cache_path: ".sessionfile".to_string(),
        }
    }
}

/// Download and print behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory the documents are saved into
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Extension appended to the last URL path segment
    pub extension: String,

    /// Command invoked with each saved file when printing is requested
    #[serde(rename = "print-command")]
    pub print_command: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            extension: "pdf".to_string(),
            print_command: "lp".to_string(),
        }
    }
}

/// CSS selectors describing the listing page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Matches each result item; its first child element carries the href
    #[serde(rename = "print-link")]
    pub print_link: String,

    /// Matches candidate pagination anchors
    pub pagination: String,

    /// Exact visible text of the pagination anchor to follow
    #[serde(rename = "show-more-text")]
    pub show_more_text: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            print_link: r#"p[class="PuzzleItem-secondary-link PuzzleItem--print-link"]"#.to_string(),
            pagination: r#"a[class="Item-cta Link--primary"]"#.to_string(),
            show_more_text: "Show more".to_string(),
        }
    }
}
