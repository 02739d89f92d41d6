//! Authenticated browsing session
//!
//! A [`Session`] owns the HTTP client and its cookie jar. The jar is seeded
//! from the cookie cache and the credentials file when the session opens and
//! written back to the cache when it closes:
//!
//! ```no_run
//! # async fn example() -> crossword_fetch::Result<()> {
//! use crossword_fetch::config::Config;
//! use crossword_fetch::prompt::TerminalPrompter;
//! use crossword_fetch::session::Session;
//!
//! let config = Config::default();
//! let session = Session::open(&config, &mut TerminalPrompter)?;
//! let response = session.get("https://www.thetimes.co.uk/puzzleclub").await?;
//! println!("{}", response.status());
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! A session dropped without [`Session::close`] still saves its jar, so early
//! returns and panics do not lose cookies the site handed out.

mod cache;
mod credentials;

pub use cache::{load_cookie_cache, save_cookie_cache};
pub use credentials::{Credentials, REQUIRED_COOKIES};

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::prompt::Prompter;
use crate::{CrosswordError, Result};
use cookie_store::CookieStore;
use reqwest::{Client, Response};
use reqwest_cookie_store::CookieStoreMutex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, MutexGuard};
use url::Url;

/// HTTP client plus the cookie jar that authenticates it
pub struct Session {
    client: Client,
    cookies: Arc<CookieStoreMutex>,
    credentials: Credentials,
    site_url: Url,
    cache_path: PathBuf,
    relogin_on_failure: bool,
    closed: bool,
}

impl Session {
    /// Opens a session, asking for login cookies if no credentials file exists yet
    pub fn open(config: &Config, prompter: &mut dyn Prompter) -> Result<Self> {
        let credentials = Credentials::load_or_prompt(
            Path::new(&config.session.credentials_path),
            prompter,
        )?;
        Self::with_credentials(config, credentials)
    }

    /// Opens a session with already loaded credentials
    ///
    /// The cached jar is loaded first and the credential cookies are applied on
    /// top of it, so fresh credentials win over stale cached values.
    pub fn with_credentials(config: &Config, credentials: Credentials) -> Result<Self> {
        let site_url = Url::parse(&config.site.base_url)?;
        let cache_path = PathBuf::from(&config.session.cache_path);

        let mut store = load_cookie_cache(&cache_path);
        let cached = store.iter_any().count();
        credentials.apply_to(&mut store, &site_url)?;
        tracing::debug!(
            "Cookie jar seeded with {} cached cookies for {}",
            cached,
            site_url
        );

        let cookies = Arc::new(CookieStoreMutex::new(store));
        let client = build_http_client(&config.site.user_agent, Arc::clone(&cookies))?;

        Ok(Self {
            client,
            cookies,
            credentials,
            site_url,
            cache_path,
            relogin_on_failure: config.site.relogin_on_failure,
            closed: false,
        })
    }

    /// Sends an authenticated GET request
    ///
    /// With `relogin-on-failure` enabled, a non-success response is treated as
    /// a logged-out session: the jar is reset to the credential cookies and the
    /// request is sent one more time. Whatever the second attempt returns is
    /// handed back.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self.send(url).await?;
        if response.status().is_success() || !self.relogin_on_failure {
            return Ok(response);
        }

        tracing::warn!(
            "GET {} returned {}, logging in again",
            url,
            response.status()
        );
        self.relogin()?;
        self.send(url).await
    }

    async fn send(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|source| CrosswordError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Drops every cookie and re-applies the credential cookies
    pub fn relogin(&self) -> Result<()> {
        let mut store = self.lock_cookies()?;
        *store = CookieStore::default();
        self.credentials.apply_to(&mut store, &self.site_url)
    }

    /// Returns the value of the first cookie in the jar with this name
    pub fn cookie_value(&self, name: &str) -> Result<Option<String>> {
        let store = self.lock_cookies()?;
        let value = store
            .iter_any()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string());
        Ok(value)
    }

    /// Writes the current jar to the cookie cache
    pub fn persist(&self) -> Result<()> {
        let store = self.lock_cookies()?;
        save_cookie_cache(&store, &self.cache_path)?;
        tracing::debug!("Saved cookie jar to {}", self.cache_path.display());
        Ok(())
    }

    /// Saves the jar and ends the session
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.persist()
    }

    fn lock_cookies(&self) -> Result<MutexGuard<'_, CookieStore>> {
        self.cookies
            .lock()
            .map_err(|_| CrosswordError::CookieStore("cookie jar lock poisoned".to_string()))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.persist() {
            tracing::warn!(
                "Failed to save cookie jar to {}: {}",
                self.cache_path.display(),
                e
            );
        }
    }
}
