// Dribbble API endpoint functions.
// Token verification and shot listings on top of the shared request pipeline.

use tracing::debug;

use crate::cache::CacheStore;
use crate::config::DEFAULT_SHOTS_COUNT;
use crate::error::{DribbbleError, Result};

use super::client::DribbbleClient;
use super::transport::Transport;
use super::types::{Shot, parse_shots};

const USERS_SLUG: &str = "/users";
const SHOTS_SLUG: &str = "/shots";

/// Path of a user's shots listing.
pub fn user_shots_path(username: &str, count: u32) -> String {
    format!("{USERS_SLUG}/{username}{SHOTS_SLUG}?per_page={count}")
}

impl<S: CacheStore, T: Transport> DribbbleClient<S, T> {
    /// Check that `token` is accepted by the API.
    ///
    /// Probes the shots endpoint with a HEAD request that bypasses the cache.
    /// Any transport error or status other than 200 is a failure.
    pub async fn check_access_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(DribbbleError::InvalidInput("access token is empty"));
        }

        self.send_request(SHOTS_SLUG, token, true, true)
            .await
            .into_body()
            .map(|_| ())
    }

    /// Whether `token` is accepted by the API.
    pub async fn verify_access_token(&self, token: &str) -> bool {
        match self.check_access_token(token).await {
            Ok(()) => true,
            Err(e) => {
                debug!("Access token rejected: {e}");
                false
            }
        }
    }

    /// Get up to `count` of a user's most recent shots.
    ///
    /// The count is passed to the API as the page size without range checks.
    pub async fn retrieve_shots(&self, username: &str, token: &str, count: u32) -> Result<Vec<Shot>> {
        if username.is_empty() {
            return Err(DribbbleError::InvalidInput("username is empty"));
        }
        if token.is_empty() {
            return Err(DribbbleError::InvalidInput("access token is empty"));
        }

        let body = self
            .send_request(&user_shots_path(username, count), token, false, false)
            .await
            .into_body()?;

        parse_shots(&body)
    }

    /// Get a user's most recent shots using the default count.
    pub async fn retrieve_recent_shots(&self, username: &str, token: &str) -> Result<Vec<Shot>> {
        self.retrieve_shots(username, token, DEFAULT_SHOTS_COUNT)
            .await
    }
}
