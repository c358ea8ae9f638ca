//! Authentication middleware and extractors.
//!
//! The session holds only the identity service tokens. Each request resolves
//! them to a [`User`] through the configured [`AuthBackend`](crate::auth::AuthBackend),
//! so the signed-in user is always explicit per-request context.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use photoart_core::User;
use tower_sessions::Session;

use crate::auth::AuthSession;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{StoredAuth, session_keys};
use crate::state::AppState;

/// The signed-in user together with the tokens that identify them.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub auth: StoredAuth,
}

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, redirects to the login page with a `redirect_to`
/// parameter pointing back at the requested page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(current): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.display_name())
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page, returning to `path` afterwards.
    RedirectToLogin(String),
    /// The session layer is missing.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(path) => Redirect::to(&login_url(&path)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Login page URL that returns to `path` after signing in.
#[must_use]
pub fn login_url(path: &str) -> String {
    format!("/auth/login?redirect_to={}", urlencoding::encode(path))
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        // Nested routers see a stripped URI; the original keeps the full path
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or(&parts.uri, |original| &original.0);
        let path = uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();

        resolve_user(&session, state)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin(path))
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(current): OptionalAuth,
/// ) -> impl IntoResponse {
///     match current {
///         Some(c) => format!("Hello, {}!", c.user.display_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl OptionalAuth {
    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|c| &c.user)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = match parts.extensions.get::<Session>().cloned() {
            Some(session) => resolve_user(&session, state).await,
            None => None,
        };
        Ok(Self(current))
    }
}

/// Look up the user behind the session's tokens.
///
/// Tokens the identity service no longer accepts are dropped from the session.
async fn resolve_user(session: &Session, state: &AppState) -> Option<CurrentUser> {
    let stored: StoredAuth = session
        .get(session_keys::AUTH)
        .await
        .ok()
        .flatten()?;

    if stored.is_expired(chrono::Utc::now().timestamp()) {
        tracing::debug!("Stored access token expired");
        forget_stale_auth(session).await;
        return None;
    }

    match state.auth().get_user(stored.access_token()).await {
        Ok(user) => Some(CurrentUser { user, auth: stored }),
        Err(e) if e.is_session_expired() => {
            tracing::debug!("Identity service rejected stored token");
            forget_stale_auth(session).await;
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to look up current user");
            None
        }
    }
}

async fn forget_stale_auth(session: &Session) {
    if let Err(e) = clear_auth(session).await {
        tracing::warn!(error = %e, "Failed to clear stale auth from session");
    }
}

/// Store a fresh identity service session.
///
/// The session ID is cycled to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth(
    session: &Session,
    auth: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTH, StoredAuth::from(auth))
        .await?;
    set_sentry_user(&auth.user.id, None);
    Ok(())
}

/// Forget the signed-in user (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<StoredAuth>(session_keys::AUTH).await?;
    clear_sentry_user();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_return_path() {
        assert_eq!(
            login_url("/account/orders"),
            "/auth/login?redirect_to=%2Faccount%2Forders"
        );
        assert_eq!(
            login_url("/checkout?step=contact"),
            "/auth/login?redirect_to=%2Fcheckout%3Fstep%3Dcontact"
        );
    }

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AuthRejection::RedirectToLogin("/account/profile".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/auth/login?redirect_to=%2Faccount%2Fprofile")
        );
    }
}
