//! Dribbble shots with cached API responses.
//!
//! [`DribbbleClient`] verifies access tokens and lists a user's recent shots,
//! keeping responses for an hour in an injected [`CacheStore`]. The
//! [`widget`] module renders the shots as an HTML fragment and [`settings`]
//! persists the account name and token.
//!
//! For one-off use, [`get_dribbble_feed`] and [`verify_dribbble_access_token`]
//! run the same operations against the platform cache directory.

pub mod cache;
pub mod config;
pub mod dribbble;
pub mod error;
pub mod settings;
pub mod widget;

use tracing::warn;

pub use cache::{CacheStore, FileCache, MemoryCache};
pub use config::ClientConfig;
pub use dribbble::{DribbbleClient, RequestOutcome, Shot};
pub use error::{DribbbleError, Result};
pub use settings::Settings;
pub use widget::WidgetOptions;

/// Fetch up to `count` of `username`'s shots with the default client.
///
/// Empty input is rejected before the client or its cache directory is set up.
pub async fn get_dribbble_feed(username: &str, token: &str, count: u32) -> Result<Vec<Shot>> {
    if username.is_empty() {
        return Err(DribbbleError::InvalidInput("username is empty"));
    }
    if token.is_empty() {
        return Err(DribbbleError::InvalidInput("access token is empty"));
    }

    DribbbleClient::with_default_cache()?
        .retrieve_shots(username, token, count)
        .await
}

/// Whether the API accepts `token`, checked with the default client.
pub async fn verify_dribbble_access_token(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    match DribbbleClient::with_default_cache() {
        Ok(client) => client.verify_access_token(token).await,
        Err(e) => {
            warn!("Could not create Dribbble client: {e}");
            false
        }
    }
}
