// Cache stores for API responses.
// A small get/set/TTL key-value surface with in-memory and filesystem backends.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{DribbbleError, Result};

use super::paths;

/// Key-value store with per-value expiry.
///
/// Values past their TTL are reported as absent. Setting a key replaces the
/// previous value and restarts its TTL.
pub trait CacheStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;
}

impl<S: CacheStore + ?Sized> CacheStore for &S {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }
}

impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }
}

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
    /// Lifetime of the data, counted from `cached_at`.
    pub ttl_secs: u64,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Check if this cached data has outlived its TTL.
    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed > Duration::from_secs(self.ttl_secs)
    }

    /// Check if this cached data is still valid (not expired).
    pub fn is_valid(&self) -> bool {
        !self.is_expired()
    }
}

/// Process-local cache store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedData<Value>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, CachedData<Value>>>> {
        self.entries
            .lock()
            .map_err(|_| DribbbleError::Cache("memory cache lock poisoned".to_string()))
    }

    /// Shift the stored timestamp of `key` into the past.
    #[cfg(test)]
    pub(crate) fn backdate(&self, key: &str, by: Duration) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.cached_at = entry.cached_at - chrono::Duration::from_std(by).unwrap();
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(cached) if cached.is_valid() => Ok(Some(cached.data.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.lock()?
            .insert(key.to_string(), CachedData::new(value, ttl));
        Ok(())
    }
}

/// Cache store persisting one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Create a file cache rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a file cache in the platform cache directory.
    pub fn in_default_dir() -> Result<Self> {
        paths::cache_dir()
            .map(Self::new)
            .ok_or_else(|| DribbbleError::Cache("no cache directory available".to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", paths::sanitize_name(key)))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read(&path)?;
        let cached: CachedData<Value> = match serde_json::from_slice(&contents) {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Ignoring unreadable cache file {}: {e}", path.display());
                return Ok(None);
            }
        };

        if cached.is_expired() {
            return Ok(None);
        }
        Ok(Some(cached.data))
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let path = self.path_for(key);
        write_json(&path, &CachedData::new(value, ttl))
    }
}

/// Write data as pretty JSON via a temp file and rename.
pub(crate) fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
