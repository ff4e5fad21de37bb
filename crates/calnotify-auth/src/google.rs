//! Google OAuth2 provider for Calendar access.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use calnotify_core::{AuthError, GoogleConfig};

use crate::oauth::{OAuth2Config, OAuth2Provider};
use crate::storage::{SecureStorage, TokenSet};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Event read/write plus read-only access to the calendar list.
pub const CALENDAR_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar.events",
    "https://www.googleapis.com/auth/calendar.calendarlist.readonly",
];

const SERVICE_ID: &str = "google";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

pub struct GoogleOAuth2Provider {
    config: OAuth2Config,
    http: reqwest::Client,
}

impl GoogleOAuth2Provider {
    pub fn new(client_id: String, client_secret: String, redirect_port: u16) -> Self {
        Self {
            config: OAuth2Config {
                client_id,
                client_secret,
                auth_url: GOOGLE_AUTH_URL.to_string(),
                token_url: GOOGLE_TOKEN_URL.to_string(),
                redirect_port,
                scopes: CALENDAR_SCOPES.iter().map(|s| s.to_string()).collect(),
                // Offline access so Google issues a refresh token
                extra_params: vec![
                    ("access_type".to_string(), "offline".to_string()),
                    ("prompt".to_string(), "consent".to_string()),
                ],
            },
            http: reqwest::Client::new(),
        }
    }

    /// Build a provider from the `[google]` config section.
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured.into());
        }
        Ok(Self::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_port,
        ))
    }

    /// Point token requests somewhere else (a local mock server in tests).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.config.token_url = token_url.into();
        self
    }

    /// Refresh an expired access token.
    #[tracing::instrument(skip(self, refresh_token), level = "info")]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<GoogleTokenResponse> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send refresh request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuthFailed(format!("Token refresh failed: {}", error_text)).into());
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .context("Failed to parse refresh response")
    }

    /// Return a usable access token, refreshing and re-storing it when it is
    /// close to expiry.
    pub async fn valid_access_token(&self, storage: &SecureStorage) -> Result<String> {
        let token_set = storage.retrieve_token(SERVICE_ID)?;

        if !token_set.needs_refresh() {
            return Ok(token_set.access_token);
        }

        let Some(refresh_token) = token_set.refresh_token.as_deref() else {
            return Err(AuthError::TokenExpired.into());
        };

        tracing::info!("Access token near expiry, refreshing");
        let new_tokens = self.refresh_token(refresh_token).await?;

        let scopes = if new_tokens.scope.is_empty() {
            token_set.scopes.clone()
        } else {
            new_tokens.scope.split(' ').map(|s| s.to_string()).collect()
        };
        let new_token_set = TokenSet {
            access_token: new_tokens.access_token.clone(),
            // Google usually omits the refresh token on refresh
            refresh_token: new_tokens.refresh_token.or(token_set.refresh_token.clone()),
            expires_at: chrono::Utc::now().timestamp() + new_tokens.expires_in as i64,
            scopes,
        };
        storage.store_token(SERVICE_ID, &new_token_set)?;

        Ok(new_tokens.access_token)
    }
}

impl OAuth2Provider for GoogleOAuth2Provider {
    fn service_id(&self) -> &str {
        SERVICE_ID
    }

    fn config(&self) -> &OAuth2Config {
        &self.config
    }
}
