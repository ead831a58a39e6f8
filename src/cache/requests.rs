// Cached API responses.
// All responses live in one object keyed by endpoint path, each tagged with the token that produced it.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::dribbble::RequestOutcome;
use crate::error::Result;

use super::store::CacheStore;

/// A cached response and the access token it was fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub access_token: String,
    pub response: RequestOutcome,
}

/// Endpoint path to cached response, stored and expired as one unit.
///
/// Entries are kept as raw JSON so that one unreadable entry does not
/// invalidate the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheObject(BTreeMap<String, Value>);

impl CacheObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached response for `path`, if it was fetched with exactly `token`.
    pub fn lookup(&self, path: &str, token: &str) -> Option<RequestOutcome> {
        let raw = self.0.get(path)?;
        let entry = match CacheEntry::deserialize(raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Malformed cache entry for {path}: {e}");
                return None;
            }
        };

        (entry.access_token == token).then_some(entry.response)
    }

    /// Set or replace the entry for `path`.
    pub fn insert(&mut self, path: &str, token: &str, response: &RequestOutcome) -> Result<()> {
        let entry = CacheEntry {
            access_token: token.to_string(),
            response: response.clone(),
        };
        self.0.insert(path.to_string(), serde_json::to_value(entry)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Responses cache addressed by a fixed key in a [`CacheStore`].
#[derive(Debug)]
pub struct RequestCache<S> {
    store: S,
    key: String,
    ttl: Duration,
}

impl<S: CacheStore> RequestCache<S> {
    pub fn new(store: S, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the whole cache object. A missing or unreadable object is `None`.
    fn load(&self) -> Result<Option<CacheObject>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_value(raw) {
            Ok(object) => Ok(Some(object)),
            Err(e) => {
                warn!("Discarding unreadable responses cache: {e}");
                Ok(None)
            }
        }
    }

    /// Cached response for `path` fetched with `token`.
    ///
    /// Store failures are logged and reported as a miss.
    pub fn read(&self, path: &str, token: &str) -> Option<RequestOutcome> {
        match self.load() {
            Ok(object) => object?.lookup(path, token),
            Err(e) => {
                warn!("Responses cache read failed: {e}");
                None
            }
        }
    }

    /// Record `response` for `path`, restarting the TTL of the whole object.
    ///
    /// Returns whether the write happened. Outcomes refused by
    /// [`RequestOutcome::is_cacheable`] are skipped, and store failures are
    /// logged rather than returned.
    pub fn write(&self, path: &str, token: &str, response: &RequestOutcome) -> bool {
        if !response.is_cacheable() {
            debug!("Not caching transport failure for {path}");
            return false;
        }

        match self.try_write(path, token, response) {
            Ok(()) => {
                debug!("Cached response for {path}");
                true
            }
            Err(e) => {
                warn!("Responses cache write failed: {e}");
                false
            }
        }
    }

    fn try_write(&self, path: &str, token: &str, response: &RequestOutcome) -> Result<()> {
        let mut object = match self.load() {
            Ok(object) => object.unwrap_or_default(),
            Err(e) => {
                warn!("Replacing unreadable responses cache: {e}");
                CacheObject::new()
            }
        };
        object.insert(path, token, response)?;
        self.store
            .set(&self.key, serde_json::to_value(&object)?, self.ttl)
    }
}
