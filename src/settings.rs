// Saved account settings.
// Account name and access token, persisted as JSON; tokens are verified before they are accepted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{CacheStore, paths, store::write_json};
use crate::dribbble::{DribbbleClient, Transport};
use crate::error::{DribbbleError, Result};

/// Rejection returned when a new access token fails verification.
pub fn invalid_access_token() -> DribbbleError {
    DribbbleError::Settings {
        code: "invalid-access-token",
        message: "The access token doesn't look quite right.",
    }
}

/// Dribbble account settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub account_name: String,
    pub access_token: String,
}

impl Settings {
    /// Read settings from `path`. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read settings from `path`, falling back to empty settings when the
    /// file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings {}: {e}", path.display());
            Self::default()
        })
    }

    /// Read settings from the platform configuration directory.
    pub fn load_default() -> Result<Self> {
        match paths::settings_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn save_default(&self) -> Result<()> {
        let path = paths::settings_path()
            .ok_or_else(|| DribbbleError::Other("no configuration directory available".to_string()))?;
        self.save(&path)
    }

    pub fn set_account_name(&mut self, name: &str) {
        self.account_name = name.trim().to_string();
    }

    /// Replace the access token if the API accepts `token`.
    ///
    /// On rejection the previous token is kept and [`invalid_access_token`]
    /// is returned.
    pub async fn update_access_token<S: CacheStore, T: Transport>(
        &mut self,
        client: &DribbbleClient<S, T>,
        token: &str,
    ) -> Result<()> {
        if !client.verify_access_token(token).await {
            return Err(invalid_access_token());
        }

        info!("Access token verified");
        self.access_token = token.to_string();
        Ok(())
    }

    /// Whether both an account name and a token are present.
    pub fn is_complete(&self) -> bool {
        !self.account_name.is_empty() && !self.access_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::ClientConfig;
    use crate::dribbble::RequestOutcome;
    use crate::dribbble::testing::FakeTransport;

    fn client(outcome: RequestOutcome) -> DribbbleClient<MemoryCache, FakeTransport> {
        DribbbleClient::with_transport(
            ClientConfig::default(),
            MemoryCache::new(),
            FakeTransport::always(outcome),
        )
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(&temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.is_complete());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("settings.json");

        let mut settings = Settings::default();
        settings.set_account_name("  jsmith ");
        settings.access_token = "abc123".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.account_name, "jsmith");
        assert_eq!(loaded.access_token, "abc123");
        assert!(loaded.is_complete());
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"account_name": "jsmith"}"#).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.account_name, "jsmith");
        assert_eq!(loaded.access_token, "");
    }

    #[test]
    fn test_corrupt_file_loads_as_default_and_can_be_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "{bad").unwrap();

        assert!(Settings::load(&path).is_err());

        let mut settings = Settings::load_or_default(&path);
        assert_eq!(settings, Settings::default());

        settings.set_account_name("jsmith");
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap().account_name, "jsmith");
    }

    #[tokio::test]
    async fn test_verified_token_is_accepted() {
        let client = client(RequestOutcome::response(200, None));
        let mut settings = Settings::default();

        settings
            .update_access_token(&client, "abc123")
            .await
            .unwrap();
        assert_eq!(settings.access_token, "abc123");
    }

    #[tokio::test]
    async fn test_rejected_token_keeps_previous_value() {
        let client = client(RequestOutcome::response(401, None));
        let mut settings = Settings {
            account_name: "jsmith".to_string(),
            access_token: "old".to_string(),
        };

        let err = settings
            .update_access_token(&client, "bad")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "The access token doesn't look quite right.");
        assert!(matches!(
            err,
            DribbbleError::Settings {
                code: "invalid-access-token",
                ..
            }
        ));
        assert_eq!(settings.access_token, "old");
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected_without_request() {
        let client = client(RequestOutcome::response(200, None));
        let mut settings = Settings::default();

        assert!(settings.update_access_token(&client, "").await.is_err());
        assert_eq!(client.transport().calls(), 0);
    }
}
