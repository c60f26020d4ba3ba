//! On-disk response cache
//!
//! Responses are stored one file per request URL, named by the SHA-256 of the
//! URL. An entry older than the configured age is treated as missing, so a
//! repeated scrape on the same day reuses earlier responses while a scrape on
//! a later day sees fresh data. Only successful responses are ever stored.
//!
//! Entries are written to a `~` sibling first and renamed into place, so a
//! reader never sees a partially written body.

use crate::LibbleError;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Distinguishes temp files of concurrent writers in one process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Ages beyond a century are clamped
const MAX_AGE_HOURS: u64 = 24 * 365 * 100;

/// Directory-backed key-value store keyed by request URL
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    max_age: Duration,
}

impl ResponseCache {
    /// Creates a cache rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>, max_age_hours: u64) -> Self {
        Self {
            dir: dir.into(),
            max_age: Duration::hours(max_age_hours.min(MAX_AGE_HOURS) as i64),
        }
    }

    /// File name for a URL: hex-encoded SHA-256 of the full URL
    pub fn key(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(Self::key(url))
    }

    /// Checks whether an entry written at `written_at` has expired
    pub fn is_stale(&self, written_at: DateTime<Utc>) -> bool {
        Utc::now() - written_at > self.max_age
    }

    /// Returns the cached body for a URL, if present and fresh
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - A fresh cached response
    /// * `Ok(None)` - No entry, or the entry is stale
    /// * `Err(LibbleError::Cache)` - The entry exists but could not be read
    pub async fn get(&self, url: &Url) -> Result<Option<String>, LibbleError> {
        let path = self.path_for(url);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(cache_error(&path, source)),
        };

        let written_at: DateTime<Utc> = metadata
            .modified()
            .map_err(|source| cache_error(&path, source))?
            .into();
        if self.is_stale(written_at) {
            tracing::debug!("Cached response for {} is stale", url);
            return Ok(None);
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(cache_error(&path, source)),
        }
    }

    /// Stores a response body for a URL
    pub async fn put(&self, url: &Url, body: &str) -> Result<(), LibbleError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| cache_error(&self.dir, source))?;

        let path = self.path_for(url);
        let tmp = self.dir.join(format!(
            "{}~{}-{}",
            Self::key(url),
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(source) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(cache_error(&tmp, source));
        }
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(cache_error(&path, source));
        }
        Ok(())
    }
}

fn cache_error(path: &Path, source: std::io::Error) -> LibbleError {
    LibbleError::Cache {
        path: path.display().to_string(),
        source,
    }
}
