//! In-memory identity backend with canned responses.
//!
//! Every credential is accepted and resolves to the same demo user. The
//! backend hands out a single fixed access token and only recognizes that
//! token, so a fresh browser session starts signed out.

use async_trait::async_trait;
use photoart_core::{Email, User, UserId};
use secrecy::SecretString;
use url::Url;

use super::{AuthBackend, AuthError, AuthSession, OAuthProvider, Pkce, SignUp};

/// Access token issued by the mock backend.
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
/// Authorization code the mock "provider" redirects back with.
pub const MOCK_OAUTH_CODE: &str = "mock-oauth-code";

const MOCK_USER_ID: &str = "1";
const MOCK_USER_EMAIL: &str = "user@example.com";
const MOCK_USER_NAME: &str = "Test User";
const MOCK_UPDATED_NAME: &str = "Updated User";

/// Identity backend used when no identity service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAuthBackend;

impl MockAuthBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn user(name: &str) -> User {
        User {
            id: UserId::new(MOCK_USER_ID),
            email: MOCK_USER_EMAIL.to_string(),
            name: Some(name.to_string()),
            avatar_url: None,
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            user: Self::user(MOCK_USER_NAME),
            access_token: SecretString::from(MOCK_ACCESS_TOKEN),
            refresh_token: None,
            expires_at: None,
        }
    }

    fn check_token(access_token: &str) -> Result<(), AuthError> {
        if access_token == MOCK_ACCESS_TOKEN {
            Ok(())
        } else {
            Err(AuthError::SessionExpired)
        }
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn sign_up(
        &self,
        _name: &str,
        email: &str,
        _password: &str,
        _redirect_to: &str,
    ) -> Result<SignUp, AuthError> {
        Email::parse(email)?;
        Ok(SignUp::SignedIn(Self::session()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<AuthSession, AuthError> {
        Email::parse(email)?;
        Ok(Self::session())
    }

    fn oauth_authorize_url(
        &self,
        _provider: OAuthProvider,
        redirect_to: &str,
        _pkce: &Pkce,
    ) -> Result<String, AuthError> {
        // No provider to visit: go straight back to the callback with a code
        let mut url = Url::parse(redirect_to)
            .map_err(|e| AuthError::InvalidResponse(format!("bad redirect URL: {e}")))?;
        url.query_pairs_mut().append_pair("code", MOCK_OAUTH_CODE);
        Ok(url.into())
    }

    async fn exchange_code_for_session(
        &self,
        code: &str,
        _code_verifier: &str,
    ) -> Result<AuthSession, AuthError> {
        if code == MOCK_OAUTH_CODE {
            Ok(Self::session())
        } else {
            Err(AuthError::InvalidSessionState)
        }
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<User, AuthError> {
        Self::check_token(access_token)?;
        Ok(Self::user(MOCK_USER_NAME))
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        _redirect_to: &str,
    ) -> Result<(), AuthError> {
        Email::parse(email)?;
        Ok(())
    }

    async fn update_profile(&self, access_token: &str, _name: &str) -> Result<User, AuthError> {
        Self::check_token(access_token)?;
        Ok(Self::user(MOCK_UPDATED_NAME))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[tokio::test]
    async fn test_sign_in_returns_canned_user() {
        let backend = MockAuthBackend::new();
        let session = backend
            .sign_in_with_password("anyone@example.org", "whatever")
            .await
            .unwrap();
        assert_eq!(session.user.id.as_str(), "1");
        assert_eq!(session.user.email, "user@example.com");
        assert_eq!(session.user.name.as_deref(), Some("Test User"));
        assert_eq!(session.access_token.expose_secret(), MOCK_ACCESS_TOKEN);
    }

    #[tokio::test]
    async fn test_sign_up_signs_in() {
        let backend = MockAuthBackend::new();
        let result = backend
            .sign_up("Jo", "jo@example.com", "hunter22", "http://localhost:3000")
            .await
            .unwrap();
        assert!(matches!(result, SignUp::SignedIn(_)));
    }

    #[tokio::test]
    async fn test_only_issued_token_is_recognized() {
        let backend = MockAuthBackend::new();
        assert!(backend.get_user(MOCK_ACCESS_TOKEN).await.is_ok());
        assert!(matches!(
            backend.get_user("forged").await,
            Err(AuthError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_returns_updated_user() {
        let backend = MockAuthBackend::new();
        let user = backend
            .update_profile(MOCK_ACCESS_TOKEN, "Someone Else")
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Updated User"));
    }

    #[tokio::test]
    async fn test_oauth_round_trip() {
        let backend = MockAuthBackend::new();
        let pkce = Pkce::generate();
        let url = backend
            .oauth_authorize_url(
                OAuthProvider::Github,
                "http://localhost:3000/auth/callback?state=abc",
                &pkce,
            )
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:3000/auth/callback?state=abc&code=mock-oauth-code"
        );
        assert!(
            backend
                .exchange_code_for_session(MOCK_OAUTH_CODE, &pkce.verifier)
                .await
                .is_ok()
        );
        assert!(
            backend
                .exchange_code_for_session("other", &pkce.verifier)
                .await
                .is_err()
        );
    }
}
