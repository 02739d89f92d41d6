//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client around the session's cookie jar
//! - GET requests for listing pages, failing on non-success responses
//! - GET requests for documents, returning the raw body bytes

use crate::session::Session;
use crate::{CrosswordError, Result};
use reqwest::Client;
use reqwest_cookie_store::CookieStoreMutex;
use std::sync::Arc;
use std::time::Duration;

/// Builds an HTTP client that reads and writes the given cookie jar
///
/// Redirects are followed with reqwest's default policy, so a login bounce
/// lands on whatever page the site redirects to.
///
/// # Arguments
///
/// * `user_agent` - User agent string sent with every request
/// * `cookies` - Cookie jar shared with the owning session
pub fn build_http_client(
    user_agent: &str,
    cookies: Arc<CookieStoreMutex>,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .cookie_provider(cookies)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a listing page and returns its body
///
/// # Returns
///
/// * `Ok(String)` - The HTML of the page
/// * `Err(CrosswordError::Fetch)` - The site answered with a non-success status
/// * `Err(CrosswordError::Http)` - The request itself failed
pub async fn fetch_listing(session: &Session, url: &str) -> Result<String> {
    let response = session.get(url).await?;
    let status = response.status();

    if !status.is_success() {
        return Err(CrosswordError::Fetch {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|source| CrosswordError::Http {
        url: url.to_string(),
        source,
    })
}

/// Fetches a document and returns the raw body bytes
///
/// The status is not checked beyond a warning; whatever the site sends is
/// what gets saved.
pub async fn fetch_document(session: &Session, url: &str) -> Result<Vec<u8>> {
    let response = session.get(url).await?;
    let status = response.status();

    if !status.is_success() {
        tracing::warn!("Document {} returned HTTP {}", url, status);
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| CrosswordError::Http {
            url: url.to_string(),
            source,
        })?;
    Ok(body.to_vec())
}
