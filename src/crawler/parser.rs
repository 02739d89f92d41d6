//! Listing page extraction
//!
//! The listing markup is a contract with a third-party site, so every
//! site-specific detail lives in [`ListingSelectors`]. When the site changes
//! its markup only the selector configuration needs updating.

use crate::config::SelectorConfig;
use crate::{CrosswordError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors for one version of the listing markup
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    print_link: Selector,
    pagination: Selector,
    show_more_text: String,
}

impl ListingSelectors {
    /// Compiles the selectors from configuration
    pub fn from_config(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            print_link: create_selector(&config.print_link)?,
            pagination: create_selector(&config.pagination)?,
            show_more_text: config.show_more_text.clone(),
        })
    }
}

/// What one listing page yields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Printable document links in document order (absolute URLs)
    pub links: Vec<String>,

    /// The next listing page, if the page has a show-more control
    pub show_more: Option<String>,
}

/// Parses a listing page
///
/// Each print-link item contributes the `href` of its first child element.
/// Items without one are skipped. The first pagination anchor whose text is
/// exactly the configured show-more text provides the next page.
///
/// # Example
///
/// ```
/// use crossword_fetch::config::SelectorConfig;
/// use crossword_fetch::crawler::{parse_listing, ListingSelectors};
/// use url::Url;
///
/// let selectors = ListingSelectors::from_config(&SelectorConfig::default()).unwrap();
/// let html = r#"<p class="PuzzleItem-secondary-link PuzzleItem--print-link"><a href="/print/1">Print</a></p>"#;
/// let page_url = Url::parse("https://example.com/list").unwrap();
/// let page = parse_listing(html, &page_url, &selectors);
/// assert_eq!(page.links, vec!["https://example.com/print/1"]);
/// assert_eq!(page.show_more, None);
/// ```
pub fn parse_listing(html: &str, page_url: &Url, selectors: &ListingSelectors) -> ListingPage {
    let document = Html::parse_document(html);

    let links = extract_print_links(&document, page_url, selectors);
    let show_more = extract_show_more(&document, page_url, selectors);

    ListingPage { links, show_more }
}

fn extract_print_links(document: &Html, page_url: &Url, selectors: &ListingSelectors) -> Vec<String> {
    let mut links = Vec::new();

    for item in document.select(&selectors.print_link) {
        let href = item
            .children()
            .filter_map(ElementRef::wrap)
            .next()
            .and_then(|child| child.value().attr("href"));

        match href.and_then(|href| resolve_link(href, page_url)) {
            Some(link) => links.push(link),
            None => tracing::debug!("Skipping print item without a usable link on {}", page_url),
        }
    }

    links
}

fn extract_show_more(document: &Html, page_url: &Url, selectors: &ListingSelectors) -> Option<String> {
    document
        .select(&selectors.pagination)
        .find(|anchor| anchor.text().collect::<String>() == selectors.show_more_text)
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url))
}

/// Resolves an href against the page it was found on
///
/// Returns None for empty, fragment-only, and non-HTTP(S) links.
fn resolve_link(href: &str, page_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match page_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|e| CrosswordError::Selector {
        selector: sel_str.to_string(),
        message: format!("{:?}", e),
    })
}
