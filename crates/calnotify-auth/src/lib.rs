//! Google OAuth2 for calnotify.
//!
//! Runs the authorization-code flow, stores the resulting tokens and keeps
//! the access token fresh.

pub mod google;
pub mod oauth;
pub mod storage;

pub use google::{GoogleOAuth2Provider, GoogleTokenResponse, CALENDAR_SCOPES};
pub use oauth::{AuthorizationRequest, OAuth2Config, OAuth2Provider};
pub use storage::{SecureStorage, TokenSet};
