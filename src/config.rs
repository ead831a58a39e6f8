// Client configuration.
// Base URL, cache addressing, and HTTP options passed explicitly to the client.

use std::time::Duration;

/// Dribbble v1 REST API root.
pub const DRIBBBLE_API_BASE: &str = "https://api.dribbble.com/v1";

/// Key under which all cached responses are stored as a single object.
pub const REQUESTS_CACHE_KEY: &str = "bean-dribbble-requests-cache";

/// Lifetime of the cached responses object, restarted on every write.
pub const REQUESTS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Number of shots fetched when the caller does not ask for a count.
pub const DEFAULT_SHOTS_COUNT: u32 = 12;

/// Settings for a [`DribbbleClient`](crate::dribbble::DribbbleClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root that endpoint paths are appended to.
    pub base_url: String,
    pub cache_key: String,
    pub cache_ttl: Duration,
    pub user_agent: String,
    /// Overall request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DRIBBBLE_API_BASE.to_string(),
            cache_key: REQUESTS_CACHE_KEY.to_string(),
            cache_ttl: REQUESTS_CACHE_TTL,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}
