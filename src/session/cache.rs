//! Cookie jar cache carried between runs

use crate::{CrosswordError, Result};
use cookie_store::CookieStore;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Loads the cached cookie jar
///
/// A missing, empty, or unreadable cache is not an error: the run simply
/// starts with an empty jar.
pub fn load_cookie_cache(path: &Path) -> CookieStore {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No cookie cache at {}", path.display());
            return CookieStore::default();
        }
        Err(e) => {
            tracing::warn!("Cannot open cookie cache {}: {}", path.display(), e);
            return CookieStore::default();
        }
    };

    match CookieStore::load_json(BufReader::new(file)) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(
                "Ignoring unreadable cookie cache {}: {}",
                path.display(),
                e
            );
            CookieStore::default()
        }
    }
}

/// Owner read-write; the jar holds the login cookies
#[cfg(unix)]
const CACHE_MODE: u32 = 0o600;

/// Writes every cookie in the jar, session cookies included, to `path`
///
/// The file is restricted to its owner, including a cache left behind with
/// looser permissions by an earlier run.
pub fn save_cookie_cache(store: &CookieStore, path: &Path) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CACHE_MODE);
    }

    let mut writer = BufWriter::new(options.open(path)?);
    store
        .save_incl_expired_and_nonpersistent_json(&mut writer)
        .map_err(|e| CrosswordError::CookieStore(e.to_string()))?;
    writer.flush()?;
    drop(writer);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(CACHE_MODE))?;
    }

    Ok(())
}
