//! Authentication against the identity service.
//!
//! Route handlers talk to an [`AuthBackend`], never to a concrete client. Two
//! implementations exist:
//!
//! - [`SupabaseAuthClient`] - GoTrue REST API of a Supabase project
//! - [`MockAuthBackend`] - canned in-memory responses for local development
//!
//! [`backend_from_config`] picks one at startup.

mod error;
mod mock;
pub mod pkce;
mod supabase;

pub use error::{AuthAction, AuthError};
pub use mock::{MOCK_ACCESS_TOKEN, MOCK_OAUTH_CODE, MockAuthBackend};
pub use pkce::Pkce;
pub use supabase::SupabaseAuthClient;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use photoart_core::User;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::StorefrontConfig;

/// Social sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
    Twitter,
}

impl OAuthProvider {
    pub const ALL: [Self; 3] = [Self::Google, Self::Github, Self::Twitter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Twitter => "twitter",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Twitter => "Twitter",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AuthError::UnsupportedProvider(s.to_string()))
    }
}

/// An authenticated session issued by the identity service.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Unix timestamp at which the access token expires.
    pub expires_at: Option<i64>,
}

/// Result of a sign-up.
#[derive(Debug, Clone)]
pub enum SignUp {
    /// The account is active and the user is signed in.
    SignedIn(AuthSession),
    /// The account was created but the email address must be confirmed first.
    ConfirmationRequired(User),
}

/// Capability interface over the identity service.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Create an account with a display name.
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<SignUp, AuthError>;

    /// Sign in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    /// URL to send the browser to for social sign-in.
    ///
    /// The provider eventually redirects to `redirect_to` with a `code`
    /// query parameter.
    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        pkce: &Pkce,
    ) -> Result<String, AuthError>;

    /// Exchange the callback `code` for a session.
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<AuthSession, AuthError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Look up the user owning `access_token`.
    async fn get_user(&self, access_token: &str) -> Result<User, AuthError>;

    /// Send a password reset email linking to `redirect_to`.
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str)
    -> Result<(), AuthError>;

    /// Change the user's display name.
    async fn update_profile(&self, access_token: &str, name: &str) -> Result<User, AuthError>;
}

/// Build the backend selected by configuration.
///
/// Falls back to [`MockAuthBackend`] when no Supabase project is configured.
#[must_use]
pub fn backend_from_config(config: &StorefrontConfig) -> Arc<dyn AuthBackend> {
    match &config.supabase {
        Some(supabase) => {
            tracing::info!(url = %supabase.url, "Using Supabase identity service");
            Arc::new(SupabaseAuthClient::new(supabase))
        }
        None => {
            tracing::warn!("Supabase credentials not found. Using mock implementation.");
            Arc::new(MockAuthBackend::new())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("google".parse::<OAuthProvider>().unwrap(), OAuthProvider::Google);
        assert_eq!("twitter".parse::<OAuthProvider>().unwrap(), OAuthProvider::Twitter);
        assert!(matches!(
            "facebook".parse::<OAuthProvider>(),
            Err(AuthError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_mock_selected_without_supabase() {
        let backend = backend_from_config(&StorefrontConfig::local());
        assert_eq!(backend.name(), "mock");
    }
}
