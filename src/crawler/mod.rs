//! Crawler module for listing walks and document downloads
//!
//! This module contains the core crawling logic, including:
//! - HTTP client construction and fetch helpers
//! - Listing extraction behind configurable selectors
//! - Show-more pagination and document saving
//! - The optional print hook

mod coordinator;
mod fetcher;
mod parser;
mod printer;

pub use coordinator::{document_file_name, CrawlReport, Crawler};
pub use fetcher::{build_http_client, fetch_document, fetch_listing};
pub use parser::{parse_listing, ListingPage, ListingSelectors};
pub use printer::Printer;

use crate::config::Config;
use crate::prompt::Prompter;
use crate::query::SearchQuery;
use crate::session::Session;
use crate::Result;

/// Runs a complete search-and-download operation
///
/// This is the main entry point. It will:
/// 1. Open the session (prompting for login cookies on first use)
/// 2. Walk the search listing for the query
/// 3. Download, and optionally print, every result
/// 4. Close the session, saving the cookie jar
///
/// The cookie jar is saved whether or not the crawl succeeds. A crawl error
/// takes precedence over a failure to save the jar.
pub async fn crawl(
    config: &Config,
    query: &SearchQuery,
    print: bool,
    prompter: &mut dyn Prompter,
) -> Result<CrawlReport> {
    let session = Session::open(config, prompter)?;

    let outcome = async {
        let crawler = Crawler::new(&session, config)?;
        crawler.get_crosswords(query, print).await
    }
    .await;

    let closed = session.close();
    let report = outcome?;
    closed?;
    Ok(report)
}
