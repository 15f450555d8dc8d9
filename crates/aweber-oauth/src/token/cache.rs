//! File-backed token cache.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::Token;
use crate::error::Result;

/// Cache file name, relative to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "aweber_token.json";

/// JSON file holding the last token obtained.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

impl TokenCache {
    /// Creates a cache backed by `path`. Nothing is read until [`Self::load`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token, whatever its expiry.
    ///
    /// Returns `Ok(None)` when there is no cache file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Token>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No token cache at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Loads the cached token only if it can be reused right now.
    ///
    /// Read and parse failures are logged and reported as
    /// [`CachedToken::Missing`]. Expired tokens are handed back so the
    /// caller can attempt a refresh.
    #[must_use]
    pub fn load_valid(&self) -> CachedToken {
        match self.load() {
            Ok(Some(token)) if token.is_reusable_at(Utc::now()) => {
                info!("Loaded valid token from cache");
                CachedToken::Valid(token)
            }
            Ok(Some(token)) => {
                warn!("Cached token expired");
                CachedToken::Expired(token)
            }
            Ok(None) => CachedToken::Missing,
            Err(e) => {
                warn!("Error loading token cache: {e}");
                CachedToken::Missing
            }
        }
    }

    /// Writes `token`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string(token)?;
        fs::write(&self.path, json)?;
        info!("Token cached locally at {}", self.path.display());
        Ok(())
    }
}

/// Outcome of reading the cache at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedToken {
    /// Token with an expiry strictly in the future.
    Valid(Token),
    /// Token that must not be reused as-is; may still hold a refresh token.
    Expired(Token),
    /// No usable cache content.
    Missing,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> TokenCache {
        TokenCache::new(dir.path().join(DEFAULT_TOKEN_FILE))
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.load().unwrap().is_none());
        assert_eq!(cache.load_valid(), CachedToken::Missing);
    }

    #[test]
    fn test_save_then_load_valid() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let token = Token::new("abc", "Bearer")
            .with_refresh_token("r")
            .with_expires_at(Utc::now() + Duration::hours(2));
        cache.save(&token).unwrap();

        match cache.load_valid() {
            CachedToken::Valid(loaded) => {
                assert_eq!(loaded.access_token, "abc");
                assert_eq!(loaded.refresh_token.as_deref(), Some("r"));
            }
            other => panic!("expected valid token, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_token_not_valid() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let token = Token::new("old", "Bearer").with_expires_at(Utc::now() - Duration::hours(1));
        cache.save(&token).unwrap();

        assert!(matches!(cache.load_valid(), CachedToken::Expired(t) if t.access_token == "old"));
    }

    #[test]
    fn test_token_without_expiry_not_valid() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        fs::write(cache.path(), r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();

        assert!(matches!(cache.load_valid(), CachedToken::Expired(_)));
    }

    #[test]
    fn test_corrupt_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        fs::write(cache.path(), "{not json").unwrap();

        assert!(cache.load().is_err());
        assert_eq!(cache.load_valid(), CachedToken::Missing);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.save(&Token::new("first", "Bearer")).unwrap();
        cache.save(&Token::new("second", "Bearer")).unwrap();

        assert_eq!(cache.load().unwrap().unwrap().access_token, "second");
    }
}
