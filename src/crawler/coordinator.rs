//! Crawler coordinator - listing walk and document downloads
//!
//! This module ties the session, the fetcher, and the listing parser together:
//! - Following show-more pagination until the listing runs out
//! - Saving every printable document to the output directory
//! - Optionally handing each saved file to the printer

use crate::config::{Config, SiteConfig};
use crate::crawler::fetcher::{fetch_document, fetch_listing};
use crate::crawler::parser::{parse_listing, ListingSelectors};
use crate::crawler::printer::Printer;
use crate::query::SearchQuery;
use crate::session::Session;
use crate::{CrosswordError, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// Outcome of a full search-and-download run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// The listing URL the crawl started from
    pub search_url: String,
    /// Number of printable links found across all listing pages
    pub found: usize,
    /// Files written, in download order
    pub saved: Vec<PathBuf>,
}

/// Walks the listing and downloads documents through one session
pub struct Crawler<'a> {
    session: &'a Session,
    site: SiteConfig,
    selectors: ListingSelectors,
    output_dir: PathBuf,
    extension: String,
    printer: Printer,
}

impl<'a> Crawler<'a> {
    /// Creates a crawler using the session for every request
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(CrosswordError::Selector)` - A configured selector does not compile
    pub fn new(session: &'a Session, config: &Config) -> Result<Self> {
        Ok(Self {
            session,
            site: config.site.clone(),
            selectors: ListingSelectors::from_config(&config.selectors)?,
            output_dir: PathBuf::from(&config.download.output_dir),
            extension: config.download.extension.clone(),
            printer: Printer::new(config.download.print_command.clone()),
        })
    }

    /// Collects every printable link reachable from a listing page
    ///
    /// # Pagination
    ///
    /// Pages are fetched one after another. Links accumulate in page order,
    /// and in document order within a page. The walk stops when:
    /// - a page has no printable links (its show-more control is ignored)
    /// - a page has no show-more control
    /// - the show-more control points back to a page already fetched
    ///
    /// # Errors
    ///
    /// Any non-success listing response aborts the walk with
    /// `CrosswordError::Fetch`.
    pub async fn fetch_links(&self, url: &str) -> Result<Vec<String>> {
        let mut links = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next.take() {
            // Compare normalised URLs; show-more hrefs come back re-serialised
            let base = Url::parse(&page_url)?;
            if !visited.insert(base.to_string()) {
                tracing::warn!("Show more link loops back to {}, stopping", page_url);
                break;
            }

            let html = fetch_listing(self.session, &page_url).await?;
            let page = parse_listing(&html, &base, &self.selectors);

            tracing::info!("Found {} crosswords", page.links.len());
            if page.links.is_empty() {
                break;
            }

            links.extend(page.links);
            next = page.show_more;
        }

        Ok(links)
    }

    /// Downloads a document and writes the raw body to the output directory
    ///
    /// The file is named after the last path segment of the URL with the
    /// configured extension appended. An existing file of the same name is
    /// overwritten.
    ///
    /// # Returns
    ///
    /// The path of the written file
    pub async fn download_and_save(&self, url: &str) -> Result<PathBuf> {
        let file_name = document_file_name(url, &self.extension)?;
        let body = fetch_document(self.session, url).await?;

        tracing::info!("Saving {}", url);
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(file_name);
        tokio::fs::write(&path, &body).await?;

        tracing::debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(path)
    }

    /// Searches for a puzzle type and date range and downloads every result
    ///
    /// Downloads happen strictly one after another. With `print` set, each
    /// saved file is handed to the print command as soon as it is written.
    pub async fn get_crosswords(&self, query: &SearchQuery, print: bool) -> Result<CrawlReport> {
        let search_url = query.search_url(&self.site);
        tracing::debug!("Search URL: {}", search_url);

        let links = self.fetch_links(&search_url).await?;
        tracing::info!("Downloading {} crosswords", links.len());

        let mut saved = Vec::with_capacity(links.len());
        for link in &links {
            let path = self.download_and_save(link).await?;
            if print {
                self.printer.print(&path);
            }
            saved.push(path);
        }

        Ok(CrawlReport {
            search_url,
            found: links.len(),
            saved,
        })
    }
}

/// Derives the local file name for a document URL
///
/// # Example
///
/// ```
/// use crossword_fetch::crawler::document_file_name;
///
/// let name = document_file_name("https://example.com/print/document123?v=2", "pdf").unwrap();
/// assert_eq!(name, "document123.pdf");
/// ```
pub fn document_file_name(url: &str, extension: &str) -> Result<String> {
    let parsed = Url::parse(url)?;

    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| CrosswordError::FileName {
            url: url.to_string(),
        })?;

    Ok(format!("{}.{}", segment, extension))
}
