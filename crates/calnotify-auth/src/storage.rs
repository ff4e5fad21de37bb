use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use calnotify_core::AuthError;

/// Seconds before expiry at which a token is considered due for refresh.
const REFRESH_MARGIN_SECS: i64 = 300;

/// Token set for OAuth2 authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for API requests
    pub access_token: String,

    /// Optional refresh token for token renewal
    pub refresh_token: Option<String>,

    /// Token expiration timestamp (Unix timestamp)
    pub expires_at: i64,

    /// Scopes granted to this token
    pub scopes: Vec<String>,
}

impl TokenSet {
    /// Check if the token needs refresh (within 5 minutes of expiry)
    pub fn needs_refresh(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - REFRESH_MARGIN_SECS
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at
    }
}

/// File-based token storage.
///
/// One JSON file per service under `<dir>/<service>.json`.
#[derive(Debug, Clone)]
pub struct SecureStorage {
    dir: PathBuf,
}

impl SecureStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self, service: &str) -> PathBuf {
        self.dir.join(format!("{}.json", service))
    }

    /// Store a token set, replacing any previous one for `service`.
    pub fn store_token(&self, service: &str, token_set: &TokenSet) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AuthError::StorageError(e.to_string()))
            .context("Failed to create tokens directory")?;

        let path = self.token_path(service);
        let json =
            serde_json::to_string_pretty(token_set).context("Failed to serialize token set")?;

        fs::write(&path, &json)
            .map_err(|e| AuthError::StorageError(e.to_string()))
            .context("Failed to write token file")?;
        restrict_permissions(&path)?;

        tracing::info!("Stored token for service: {} at {:?}", service, path);
        Ok(())
    }

    /// Retrieve the token set for `service`.
    ///
    /// Fails with [`AuthError::TokenNotFound`] when nothing is stored.
    pub fn retrieve_token(&self, service: &str) -> Result<TokenSet> {
        let path = self.token_path(service);

        if !path.exists() {
            return Err(AuthError::TokenNotFound(service.to_string()).into());
        }

        let json = fs::read_to_string(&path).context("Failed to read token file")?;

        let token_set: TokenSet =
            serde_json::from_str(&json).context("Failed to deserialize token set")?;

        tracing::debug!("Retrieved token for service: {}", service);
        Ok(token_set)
    }

    /// Delete the token set for `service`, if any.
    pub fn delete_token(&self, service: &str) -> Result<()> {
        let path = self.token_path(service);

        if path.exists() {
            fs::remove_file(&path).context("Failed to delete token file")?;
            tracing::info!("Deleted token for service: {}", service);
        }

        Ok(())
    }

    pub fn has_token(&self, service: &str) -> bool {
        self.token_path(service).exists()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .context("Failed to restrict token file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn token(expires_at: i64) -> TokenSet {
        TokenSet {
            access_token: "test".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
            scopes: vec![],
        }
    }

    #[test]
    fn test_token_expiry() {
        let now = chrono::Utc::now().timestamp();

        let expired = token(now - 3600);
        assert!(expired.is_expired());
        assert!(expired.needs_refresh());

        let valid = token(now + 3600);
        assert!(!valid.is_expired());
        assert!(!valid.needs_refresh());

        // Needs refresh soon
        let soon = token(now + 200);
        assert!(!soon.is_expired());
        assert!(soon.needs_refresh());
    }

    #[test]
    fn test_store_retrieve_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SecureStorage::new(dir.path().join("tokens"));

        assert!(!storage.has_token("google"));
        storage.store_token("google", &token(42)).unwrap();
        assert!(storage.has_token("google"));

        let loaded = storage.retrieve_token("google").unwrap();
        assert_eq!(loaded.expires_at, 42);
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));

        storage.delete_token("google").unwrap();
        assert!(!storage.has_token("google"));
    }

    #[test]
    fn test_missing_token_is_token_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SecureStorage::new(dir.path());

        let err = storage.retrieve_token("google").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuthError>(),
            Some(AuthError::TokenNotFound(service)) if service == "google"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = SecureStorage::new(dir.path());
        storage.store_token("google", &token(1)).unwrap();

        let mode = fs::metadata(dir.path().join("google.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
