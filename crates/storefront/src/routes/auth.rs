//! Authentication route handlers.
//!
//! Handles login, registration, password reset, and social sign-in through
//! the configured [`AuthBackend`](crate::auth::AuthBackend).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::auth::{AuthAction, AuthError, OAuthProvider, Pkce, SignUp, pkce::random_state};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_auth, set_auth};
use crate::models::session_keys;
use crate::routes::Layout;
use crate::state::AppState;

const OAUTH_STATE_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 6;

/// Only same-site paths are accepted as post-login destinations.
fn safe_redirect(target: Option<&str>) -> String {
    target
        .map(str::trim)
        .filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.starts_with("/\\"))
        .unwrap_or("/")
        .to_string()
}

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Social sign-in form data.
#[derive(Debug, Default, Deserialize)]
pub struct SocialLoginForm {
    pub redirect_to: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Where to go after signing in.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub redirect_to: Option<String>,
}

/// Forgot password page query.
#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordQuery {
    pub sent: Option<String>,
}

/// OAuth callback query.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<String>,
    pub email: String,
    pub redirect_to: String,
    pub providers: [OAuthProvider; 3],
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub error: Option<String>,
    pub name: String,
    pub email: String,
    pub redirect_to: String,
    pub providers: [OAuthProvider; 3],
}

/// Registration success page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub layout: Layout,
    pub email: String,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: Layout,
    pub sent: bool,
}

/// OAuth callback failure page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/error.html")]
pub struct AuthErrorTemplate {
    pub layout: Layout,
    pub message: String,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. Signed-in visitors go straight to `redirect_to`.
#[instrument(skip(session, auth))]
pub async fn login_page(
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let redirect_to = safe_redirect(query.redirect_to.as_deref());
    if auth.user().is_some() {
        return Redirect::to(&redirect_to).into_response();
    }

    LoginTemplate {
        layout: Layout::load(&session, &auth).await,
        error: None,
        email: String::new(),
        redirect_to,
        providers: OAuthProvider::ALL,
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let redirect_to = safe_redirect(form.redirect_to.as_deref());

    match state
        .auth()
        .sign_in_with_password(form.email.trim(), &form.password)
        .await
    {
        Ok(auth_session) => {
            set_auth(&session, &auth_session).await?;
            add_breadcrumb("auth", "Signed in", None);
            tracing::info!(user_id = %auth_session.user.id, "User signed in");
            Ok(Redirect::to(&redirect_to).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let page = LoginTemplate {
                layout: Layout::load(&session, &OptionalAuth(None)).await,
                error: Some(AuthAction::Login.user_message(&e)),
                email: form.email,
                redirect_to,
                providers: OAuthProvider::ALL,
            };
            Ok((failure_status(&e), page).into_response())
        }
    }
}

/// Status for a failed credential submission.
const fn failure_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
        AuthError::Service {
            status: 400..=499, ..
        } => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::Service { .. } | AuthError::Http(_) | AuthError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(session, auth))]
pub async fn register_page(
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<RedirectQuery>,
) -> Response {
    let redirect_to = safe_redirect(query.redirect_to.as_deref());
    if auth.user().is_some() {
        return Redirect::to(&redirect_to).into_response();
    }

    RegisterTemplate {
        layout: Layout::load(&session, &auth).await,
        error: None,
        name: String::new(),
        email: String::new(),
        redirect_to,
        providers: OAuthProvider::ALL,
    }
    .into_response()
}

/// Handle registration form submission.
///
/// When the identity service requires email confirmation, a page asking the
/// visitor to check their inbox is shown instead of signing them in.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let redirect_to = safe_redirect(form.redirect_to.as_deref());
    let name = form.name.trim();

    let invalid = if name.chars().count() < 2 {
        Some("Name must be at least 2 characters.".to_string())
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        ))
    } else {
        None
    };

    let result = match invalid {
        Some(message) => Err((StatusCode::UNPROCESSABLE_ENTITY, message)),
        None => state
            .auth()
            .sign_up(
                name,
                form.email.trim(),
                &form.password,
                &state.config().auth_callback_url(),
            )
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Registration failed");
                (failure_status(&e), AuthAction::Register.user_message(&e))
            }),
    };

    match result {
        Ok(SignUp::SignedIn(auth_session)) => {
            set_auth(&session, &auth_session).await?;
            add_breadcrumb("auth", "Registered and signed in", None);
            tracing::info!(user_id = %auth_session.user.id, "User registered");
            Ok(Redirect::to(&redirect_to).into_response())
        }
        Ok(SignUp::ConfirmationRequired(user)) => {
            tracing::info!(user_id = %user.id, "User registered, confirmation pending");
            Ok(RegisterSuccessTemplate {
                layout: Layout::load(&session, &OptionalAuth(None)).await,
                email: user.email,
            }
            .into_response())
        }
        Err((status, message)) => {
            let page = RegisterTemplate {
                layout: Layout::load(&session, &OptionalAuth(None)).await,
                error: Some(message),
                name: form.name,
                email: form.email,
                redirect_to,
                providers: OAuthProvider::ALL,
            };
            Ok((status, page).into_response())
        }
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the forgot password page.
#[instrument(skip(session, auth))]
pub async fn forgot_password_page(
    session: Session,
    auth: OptionalAuth,
    Query(query): Query<ForgotPasswordQuery>,
) -> impl IntoResponse {
    ForgotPasswordTemplate {
        layout: Layout::load(&session, &auth).await,
        sent: query.sent.is_some(),
    }
}

/// Handle forgot password form submission.
///
/// Always reports success so the form cannot be used to probe for accounts.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    if let Err(e) = state
        .auth()
        .reset_password_for_email(form.email.trim(), &state.config().password_reset_url())
        .await
    {
        tracing::warn!(error = %e, "Password recovery request failed");
    }

    Redirect::to("/auth/forgot-password?sent=1").into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return to the home page.
///
/// The local session is cleared even when the identity service call fails.
#[instrument(skip(state, session, auth))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Result<Response> {
    if let Some(current) = auth.0 {
        if let Err(e) = state.auth().sign_out(current.auth.access_token()).await {
            tracing::warn!(error = %e, "{}", AuthAction::Logout.user_message(&e));
        }
        tracing::info!(user_id = %current.user.id, "User signed out");
    }

    clear_auth(&session).await?;
    add_breadcrumb("auth", "Signed out", None);
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Social Sign-in
// =============================================================================

/// Start social sign-in: remember the PKCE verifier, a CSRF state, and the
/// return path, then redirect to the provider.
#[instrument(skip(state, session, form))]
pub async fn social_login(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<String>,
    Form(form): Form<SocialLoginForm>,
) -> Result<Response> {
    let provider: OAuthProvider = provider.parse()?;
    let pkce = Pkce::generate();
    let oauth_state = random_state(OAUTH_STATE_LEN);
    let callback = format!(
        "{}?state={}",
        state.config().auth_callback_url(),
        urlencoding::encode(&oauth_state)
    );

    let url = state
        .auth()
        .oauth_authorize_url(provider, &callback, &pkce)
        .inspect_err(|e| {
            tracing::error!(error = %e, "{}", AuthAction::Social(provider).user_message(e));
        })?;

    session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await?;
    session
        .insert(session_keys::PKCE_VERIFIER, &pkce.verifier)
        .await?;
    session
        .insert(
            session_keys::AUTH_REDIRECT_TO,
            safe_redirect(form.redirect_to.as_deref()),
        )
        .await?;

    add_breadcrumb("auth", "Social sign-in started", Some(&[("provider", provider.as_str())]));
    Ok(Redirect::to(&url).into_response())
}

/// Finish social sign-in.
///
/// Without a pending sign-in in the session the visitor is sent back to the
/// login page. A provider error, a state mismatch, or a failed exchange
/// renders the authentication error page.
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let expected_state: Option<String> = session.remove(session_keys::OAUTH_STATE).await?;
    let verifier: Option<String> = session.remove(session_keys::PKCE_VERIFIER).await?;
    let redirect_to: Option<String> = session.remove(session_keys::AUTH_REDIRECT_TO).await?;

    if let Some(error) = query.error {
        tracing::warn!(error = %error, "Identity provider returned an error");
        return Ok(error_page(&session, query.error_description.unwrap_or(error)).await);
    }

    let (Some(expected_state), Some(verifier)) = (expected_state, verifier) else {
        tracing::debug!("OAuth callback without a pending sign-in");
        return Ok(Redirect::to("/auth/login").into_response());
    };

    if query.state.as_deref() != Some(expected_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Ok(error_page(
            &session,
            AuthAction::Callback.user_message(&AuthError::InvalidSessionState),
        )
        .await);
    }

    let Some(code) = query.code else {
        tracing::warn!("OAuth callback without a code");
        return Ok(error_page(&session, AuthAction::Callback.fallback_message()).await);
    };

    match state.auth().exchange_code_for_session(&code, &verifier).await {
        Ok(auth_session) => {
            set_auth(&session, &auth_session).await?;
            add_breadcrumb("auth", "Signed in with provider", None);
            tracing::info!(user_id = %auth_session.user.id, "User signed in via OAuth");
            Ok(Redirect::to(&safe_redirect(redirect_to.as_deref())).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "OAuth code exchange failed");
            Ok(error_page(&session, AuthAction::Callback.user_message(&e)).await)
        }
    }
}

async fn error_page(session: &Session, message: String) -> Response {
    let page = AuthErrorTemplate {
        layout: Layout::load(session, &OptionalAuth(None)).await,
        message,
    };
    (StatusCode::BAD_REQUEST, page).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect_accepts_local_paths() {
        assert_eq!(safe_redirect(Some("/checkout?step=contact")), "/checkout?step=contact");
        assert_eq!(safe_redirect(Some("/account/orders")), "/account/orders");
    }

    #[test]
    fn test_safe_redirect_rejects_other_sites() {
        for target in [
            None,
            Some(""),
            Some("https://evil.example"),
            Some("//evil.example"),
            Some("/\\evil.example"),
            Some("account"),
        ] {
            assert_eq!(safe_redirect(target), "/", "{target:?}");
        }
    }

    #[test]
    fn test_failure_status() {
        assert_eq!(
            failure_status(&AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            failure_status(&AuthError::Service {
                status: 500,
                message: String::new()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            failure_status(&AuthError::Service {
                status: 422,
                message: "User already registered".to_string()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            failure_status(&AuthError::UnsupportedProvider("myspace".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
