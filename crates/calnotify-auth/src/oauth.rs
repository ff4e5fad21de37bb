use anyhow::{Context, Result};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use warp::Filter;

use calnotify_core::AuthError;

use crate::storage::{SecureStorage, TokenSet};

const SUCCESS_PAGE: &str = "<html><body><h1>Authorization successful!</h1><p>You can close this window and return to the terminal.</p></body></html>";
const FAILURE_PAGE: &str = "<html><body><h1>Authorization failed</h1><p>Return to the terminal for details.</p></body></html>";

/// OAuth2 configuration
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// Client ID from OAuth provider
    pub client_id: String,

    /// Client secret from OAuth provider
    pub client_secret: String,

    /// Authorization endpoint URL
    pub auth_url: String,

    /// Token endpoint URL
    pub token_url: String,

    /// Local port the callback server listens on
    pub redirect_port: u16,

    /// Scopes to request
    pub scopes: Vec<String>,

    /// Provider-specific query parameters added to the authorization URL
    pub extra_params: Vec<(String, String)>,
}

impl OAuth2Config {
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }
}

/// A started authorization: the URL to visit plus the secrets needed to finish it.
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_token: CsrfToken,
    pub pkce_verifier: PkceCodeVerifier,
}

type CallbackOutcome = std::result::Result<(String, String), String>;
type CallbackSender = Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>;

/// OAuth2 provider trait
#[allow(async_fn_in_trait)]
pub trait OAuth2Provider: Send + Sync {
    /// Service identifier, also the token storage key
    fn service_id(&self) -> &str;

    fn config(&self) -> &OAuth2Config;

    fn client(&self) -> Result<BasicClient> {
        let config = self.config();

        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            AuthUrl::new(config.auth_url.clone()).context("Invalid auth URL")?,
            Some(TokenUrl::new(config.token_url.clone()).context("Invalid token URL")?),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_uri()).context("Invalid redirect URI")?,
        );

        Ok(client)
    }

    /// Build the authorization URL (with PKCE challenge and CSRF state)
    fn authorize(&self) -> Result<AuthorizationRequest> {
        let config = self.config();
        let client = self.client()?;

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client.authorize_url(CsrfToken::new_random);

        for scope in &config.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }
        for (name, value) in &config.extra_params {
            auth_request = auth_request.add_extra_param(name.as_str(), value.as_str());
        }

        let (auth_url, csrf_token) = auth_request.set_pkce_challenge(pkce_challenge).url();

        Ok(AuthorizationRequest {
            url: auth_url.to_string(),
            csrf_token,
            pkce_verifier,
        })
    }

    /// Exchange an authorization code for a token set
    async fn exchange_code(&self, code: String, pkce_verifier: PkceCodeVerifier) -> Result<TokenSet> {
        let client = self.client()?;
        tracing::info!("Exchanging authorization code for {}", self.service_id());

        let token_result = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::OAuthFailed(e.to_string()))
            .context("Failed to exchange authorization code")?;

        let expires_in = token_result
            .expires_in()
            .map(|d| d.as_secs() as i64)
            .unwrap_or(3600);
        let expires_at = chrono::Utc::now().timestamp() + expires_in;

        let scopes = token_result
            .scopes()
            .map(|s| s.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_else(|| self.config().scopes.clone());

        Ok(TokenSet {
            access_token: token_result.access_token().secret().clone(),
            refresh_token: token_result.refresh_token().map(|t| t.secret().clone()),
            expires_at,
            scopes,
        })
    }

    /// Full flow: local callback server, browser, code exchange, storage
    async fn authenticate(&self, storage: &SecureStorage) -> Result<TokenSet> {
        let request = self.authorize()?;
        let port = self.config().redirect_port;

        let (tx, rx) = oneshot::channel::<CallbackOutcome>();
        let tx: CallbackSender = Arc::new(Mutex::new(Some(tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let routes = warp::get()
            .and(warp::path("callback"))
            .and(warp::path::end())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::any().map(move || tx.clone()))
            .and_then(handle_callback);

        let (_addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(([127, 0, 0, 1], port), async move {
                let _ = shutdown_rx.await;
            })
            .map_err(|_| AuthError::PortInUse(port))?;
        tokio::spawn(server);

        tracing::info!("Opening browser for OAuth2 authorization...");
        eprintln!("If the browser does not open, visit:\n\n  {}\n", request.url);
        if let Err(e) = webbrowser::open(&request.url) {
            tracing::warn!("Failed to open browser: {}", e);
        }

        let outcome = rx.await.context("Failed to receive OAuth callback");
        let _ = shutdown_tx.send(());

        let (code, state) = outcome?.map_err(AuthError::OAuthFailed)?;

        if state != *request.csrf_token.secret() {
            return Err(AuthError::OAuthFailed("CSRF token mismatch".into()).into());
        }

        let token_set = self.exchange_code(code, request.pkce_verifier).await?;
        storage.store_token(self.service_id(), &token_set)?;

        tracing::info!("OAuth2 flow completed for {}", self.service_id());
        Ok(token_set)
    }

    /// Check if a stored, unexpired token exists
    fn is_authenticated(&self, storage: &SecureStorage) -> bool {
        storage
            .retrieve_token(self.service_id())
            .map(|token| !token.is_expired())
            .unwrap_or(false)
    }

    /// Sign out (delete stored token)
    fn sign_out(&self, storage: &SecureStorage) -> Result<()> {
        storage.delete_token(self.service_id())
    }
}

async fn handle_callback(
    params: HashMap<String, String>,
    tx: CallbackSender,
) -> std::result::Result<impl warp::Reply, warp::Rejection> {
    let outcome = match params.get("error") {
        Some(error) => Err(error.clone()),
        None => Ok((
            params.get("code").cloned().unwrap_or_default(),
            params.get("state").cloned().unwrap_or_default(),
        )),
    };
    let page = if outcome.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };

    if let Some(sender) = tx.lock().await.take() {
        let _ = sender.send(outcome);
    }

    Ok(warp::reply::html(page))
}
