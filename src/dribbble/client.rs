// Dribbble API client.
// Owns the transport and the injected responses cache, and runs the cache-aside request pipeline.

use tracing::debug;

use crate::cache::{CacheStore, FileCache, RequestCache};
use crate::config::ClientConfig;
use crate::error::Result;

use super::transport::{ApiRequest, ReqwestTransport, Transport};
use super::types::RequestOutcome;

/// Dribbble API client with cached responses.
pub struct DribbbleClient<S, T = ReqwestTransport> {
    transport: T,
    cache: RequestCache<S>,
    base_url: String,
}

impl<S: CacheStore> DribbbleClient<S> {
    /// Create a client talking HTTP through `reqwest`, caching into `store`.
    pub fn new(config: ClientConfig, store: S) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, store, transport))
    }
}

impl DribbbleClient<FileCache> {
    /// Create a client with default settings and the platform cache directory.
    pub fn with_default_cache() -> Result<Self> {
        Self::new(ClientConfig::default(), FileCache::in_default_dir()?)
    }
}

impl<S: CacheStore, T: Transport> DribbbleClient<S, T> {
    pub fn with_transport(config: ClientConfig, store: S, transport: T) -> Self {
        Self {
            transport,
            cache: RequestCache::new(store, config.cache_key, config.cache_ttl),
            base_url: config.base_url,
        }
    }

    pub fn cache(&self) -> &RequestCache<S> {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `path`, serving it from the cache when possible.
    ///
    /// Unless `force_no_cache` is set, a cached outcome recorded for the same
    /// path with the same token is returned as-is and no request is made.
    /// Live outcomes are always offered to the cache afterwards, so a forced
    /// request still refreshes the entry for later callers.
    pub async fn send_request(
        &self,
        path: &str,
        token: &str,
        force_no_cache: bool,
        no_body: bool,
    ) -> RequestOutcome {
        if !force_no_cache {
            if let Some(cached) = self.cache.read(path, token) {
                debug!("Cache hit for {path}");
                return cached;
            }
            debug!("Cache miss for {path}");
        }

        let outcome = self
            .transport
            .send(ApiRequest {
                url: format!("{}{}", self.base_url, path),
                token: token.to_string(),
                no_body,
            })
            .await;

        self.cache.write(path, token, &outcome);
        outcome
    }
}
