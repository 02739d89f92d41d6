//! Login cookies persisted in a small YAML file

use crate::prompt::Prompter;
use crate::{CredentialsError, CrosswordError};
use cookie_store::{CookieStore, RawCookie};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use url::Url;

/// Cookies that must be present for the site to treat us as logged in
pub const REQUIRED_COOKIES: [&str; 2] = ["acs_tnl", "sacs_tnl"];

/// Owner read-only
#[cfg(unix)]
const CREDENTIALS_MODE: u32 = 0o400;

/// Named cookie values that authenticate the session
///
/// The file is a flat `name: value` mapping. Besides the required login
/// cookies it may carry any other cookie the site wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    cookies: BTreeMap<String, String>,
}

impl Credentials {
    /// Builds credentials from the two login cookie values
    pub fn new(acs_tnl: impl Into<String>, sacs_tnl: impl Into<String>) -> Self {
        let mut cookies = BTreeMap::new();
        cookies.insert(REQUIRED_COOKIES[0].to_string(), acs_tnl.into());
        cookies.insert(REQUIRED_COOKIES[1].to_string(), sacs_tnl.into());
        Self { cookies }
    }

    /// Returns the value of a cookie
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Loads credentials from `path`
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, CredentialsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credentials: Credentials = serde_yaml::from_str(&content)?;
        credentials.check()?;
        Ok(Some(credentials))
    }

    /// Asks for each required login cookie
    pub fn prompt(prompter: &mut dyn Prompter) -> Result<Self, CredentialsError> {
        let acs_tnl = prompter.ask_secret(&format!("{} Cookie:", REQUIRED_COOKIES[0]))?;
        let sacs_tnl = prompter.ask_secret(&format!("{} Cookie:", REQUIRED_COOKIES[1]))?;

        let credentials = Self::new(acs_tnl, sacs_tnl);
        credentials.check()?;
        Ok(credentials)
    }

    /// Writes the credentials as YAML and restricts the file to its owner
    ///
    /// The values are stored unencrypted.
    pub fn save(&self, path: &Path) -> Result<(), CredentialsError> {
        let yaml = serde_yaml::to_string(&self.cookies)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        file.write_all(yaml.as_bytes())?;
        file.flush()?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(CREDENTIALS_MODE))?;
        }

        Ok(())
    }

    /// Loads the credentials file, prompting and saving it on first run
    pub fn load_or_prompt(
        path: &Path,
        prompter: &mut dyn Prompter,
    ) -> Result<Self, CredentialsError> {
        if let Some(credentials) = Self::load(path)? {
            tracing::debug!("Loaded credentials from {}", path.display());
            return Ok(credentials);
        }

        tracing::info!(
            "No credentials file at {}, asking for login cookies",
            path.display()
        );
        let credentials = Self::prompt(prompter)?;
        credentials.save(path)?;
        tracing::warn!("Login cookies saved unencrypted to {}", path.display());
        Ok(credentials)
    }

    /// Adds every credential cookie to `store` as if `site_url` had set it
    ///
    /// Existing cookies with the same name are replaced.
    pub fn apply_to(&self, store: &mut CookieStore, site_url: &Url) -> Result<(), CrosswordError> {
        for (name, value) in self.iter() {
            let mut cookie = RawCookie::new(name.to_string(), value.to_string());
            cookie.set_path("/");
            store
                .insert_raw(&cookie, site_url)
                .map_err(|e| CrosswordError::CookieStore(format!("cookie '{}': {}", name, e)))?;
        }
        Ok(())
    }

    fn check(&self) -> Result<(), CredentialsError> {
        for name in REQUIRED_COOKIES {
            match self.get(name) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(CredentialsError::Missing(name.to_string())),
            }
        }
        Ok(())
    }
}
