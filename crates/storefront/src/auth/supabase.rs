//! Supabase (GoTrue) identity service client.
//!
//! Talks to the project's `/auth/v1` REST endpoints with `reqwest`. Every
//! request carries the project's anonymous key in the `apikey` header; calls
//! on behalf of a user add the user's access token as a bearer token.
//!
//! User lookups by access token are cached with `moka` for one minute, so
//! pages that only need to know who is signed in do not hit the service on
//! every request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use photoart_core::{User, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{AuthBackend, AuthError, AuthSession, OAuthProvider, Pkce, SignUp};
use crate::config::SupabaseConfig;

/// How long a resolved access token stays cached.
const USER_CACHE_TTL: Duration = Duration::from_secs(60);
const USER_CACHE_CAPACITY: u64 = 10_000;

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
    /// Social providers fill `full_name` instead of `name`.
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl From<GoTrueUser> for User {
    fn from(user: GoTrueUser) -> Self {
        let UserMetadata {
            name,
            full_name,
            avatar_url,
        } = user.user_metadata;
        Self {
            id: UserId::new(user.id),
            email: user.email.unwrap_or_default(),
            name: name.or(full_name),
            avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token.expires_at.or_else(|| {
            token
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs)
        });
        Self {
            user: token.user.into(),
            access_token: SecretString::from(token.access_token),
            refresh_token: token.refresh_token.map(SecretString::from),
            expires_at,
        }
    }
}

/// Sign-up answers with a session when email confirmation is disabled and
/// with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(GoTrueUser),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: ProfileData<'a>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PkceGrant<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Serialize)]
struct RecoverRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct UpdateUserRequest<'a> {
    data: ProfileData<'a>,
}

#[derive(Serialize)]
struct ProfileData<'a> {
    name: &'a str,
}

/// Turn a non-success response into an [`AuthError`].
async fn error_from_response(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    AuthError::Service {
        status,
        message: parse_error_message(&text),
    }
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| body.trim().to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for a Supabase project's auth API.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    inner: Arc<SupabaseAuthClientInner>,
}

struct SupabaseAuthClientInner {
    client: reqwest::Client,
    auth_url: Url,
    anon_key: SecretString,
    users: Cache<String, User>,
}

impl SupabaseAuthClient {
    /// Create a client for the configured project.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let users = Cache::builder()
            .max_capacity(USER_CACHE_CAPACITY)
            .time_to_live(USER_CACHE_TTL)
            .build();

        let mut auth_url = config.url.clone();
        auth_url.set_path("/auth/v1/");

        Self {
            inner: Arc::new(SupabaseAuthClientInner {
                client: reqwest::Client::new(),
                auth_url,
                anon_key: config.anon_key.clone(),
                users,
            }),
        }
    }

    /// Build an endpoint URL with query parameters.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, AuthError> {
        let mut url = self
            .inner
            .auth_url
            .join(path)
            .map_err(|e| AuthError::InvalidResponse(format!("bad endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("apikey", self.inner.anon_key.expose_secret())
            .header("User-Agent", "PhotoArt/1.0")
    }

    fn user_request(
        &self,
        method: reqwest::Method,
        url: Url,
        access_token: &str,
    ) -> reqwest::RequestBuilder {
        self.request(method, url).bearer_auth(access_token)
    }

    async fn token_grant<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<AuthSession, AuthError> {
        let url = self.endpoint("token", &[("grant_type", grant_type)])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let token: TokenResponse = response.json().await?;
        let session = AuthSession::from(token);
        self.inner
            .users
            .insert(
                session.access_token.expose_secret().to_string(),
                session.user.clone(),
            )
            .await;
        Ok(session)
    }
}

#[async_trait]
impl AuthBackend for SupabaseAuthClient {
    fn name(&self) -> &'static str {
        "supabase"
    }

    #[instrument(skip(self, name, email, password))]
    async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<SignUp, AuthError> {
        let url = self.endpoint("signup", &[("redirect_to", redirect_to)])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&SignUpRequest {
                email,
                password,
                data: ProfileData { name },
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => Ok(SignUp::SignedIn(token.into())),
            SignUpResponse::User(user) => Ok(SignUp::ConfirmationRequired(user.into())),
        }
    }

    #[instrument(skip(self, email, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant("password", &PasswordGrant { email, password })
            .await
    }

    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
        pkce: &Pkce,
    ) -> Result<String, AuthError> {
        let url = self.endpoint(
            "authorize",
            &[
                ("provider", provider.as_str()),
                ("redirect_to", redirect_to),
                ("code_challenge", pkce.challenge.as_str()),
                ("code_challenge_method", Pkce::method()),
            ],
        )?;
        Ok(url.into())
    }

    #[instrument(skip_all)]
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<AuthSession, AuthError> {
        self.token_grant(
            "pkce",
            &PkceGrant {
                auth_code: code,
                code_verifier,
            },
        )
        .await
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.inner.users.invalidate(access_token).await;

        let url = self.endpoint("logout", &[])?;
        let response = self
            .user_request(reqwest::Method::POST, url, access_token)
            .send()
            .await?;

        // An already-expired token means there is nothing left to revoke
        if response.status().is_success() || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Ok(());
        }
        Err(error_from_response(response).await)
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: &str) -> Result<User, AuthError> {
        if let Some(user) = self.inner.users.get(access_token).await {
            debug!("User cache hit");
            return Ok(user);
        }

        let url = self.endpoint("user", &[])?;
        let response = self
            .user_request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::SessionExpired);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let user: User = response.json::<GoTrueUser>().await?.into();
        self.inner
            .users
            .insert(access_token.to_string(), user.clone())
            .await;
        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let url = self.endpoint("recover", &[("redirect_to", redirect_to)])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&RecoverRequest { email })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    #[instrument(skip(self, access_token))]
    async fn update_profile(&self, access_token: &str, name: &str) -> Result<User, AuthError> {
        let url = self.endpoint("user", &[])?;
        let response = self
            .user_request(reqwest::Method::PUT, url, access_token)
            .json(&UpdateUserRequest {
                data: ProfileData { name },
            })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthError::SessionExpired);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let user: User = response.json::<GoTrueUser>().await?.into();
        self.inner
            .users
            .insert(access_token.to_string(), user.clone())
            .await;
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::json;

    use super::*;

    fn client_for(url: &str) -> SupabaseAuthClient {
        SupabaseAuthClient::new(&SupabaseConfig {
            url: Url::parse(url).unwrap(),
            anon_key: SecretString::from("anon-key-for-tests"),
        })
    }

    /// Serve a stand-in for the GoTrue API on an ephemeral port.
    async fn fake_gotrue() -> String {
        async fn token(
            headers: HeaderMap,
            Query(query): Query<std::collections::HashMap<String, String>>,
            Json(body): Json<serde_json::Value>,
        ) -> axum::response::Response {
            if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("anon-key-for-tests") {
                return (StatusCode::UNAUTHORIZED, Json(json!({"message": "No API key"})))
                    .into_response();
            }
            let ok = match query.get("grant_type").map(String::as_str) {
                Some("password") => body["password"] == "correct horse",
                Some("pkce") => body["auth_code"] == "good-code",
                _ => false,
            };
            if !ok {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_grant",
                        "error_description": "Invalid login credentials"
                    })),
                )
                    .into_response();
            }
            Json(json!({
                "access_token": "token-123",
                "refresh_token": "refresh-456",
                "expires_in": 3600,
                "user": {
                    "id": "6f1c",
                    "email": "ada@example.com",
                    "user_metadata": { "full_name": "Ada Lovelace" }
                }
            }))
            .into_response()
        }

        async fn user(headers: HeaderMap) -> axum::response::Response {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer token-123") => Json(json!({
                    "id": "6f1c",
                    "email": "ada@example.com",
                    "user_metadata": { "name": "Ada", "avatar_url": "https://a/b.png" }
                }))
                .into_response(),
                _ => (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"}))).into_response(),
            }
        }

        async fn signup() -> Json<serde_json::Value> {
            Json(json!({
                "id": "new-user",
                "email": "new@example.com",
                "user_metadata": { "name": "New" }
            }))
        }

        let app = Router::new()
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/user", get(user))
            .route("/auth/v1/signup", post(signup));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_authorize_url() {
        let client = client_for("https://abcd.supabase.co");
        let pkce = Pkce::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        let url = client
            .oauth_authorize_url(
                OAuthProvider::Google,
                "https://photoart.test/auth/callback",
                &pkce,
            )
            .unwrap();
        assert_eq!(
            url,
            "https://abcd.supabase.co/auth/v1/authorize?provider=google\
             &redirect_to=https%3A%2F%2Fphotoart.test%2Fauth%2Fcallback\
             &code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM\
             &code_challenge_method=s256"
        );
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(
            parse_error_message(r#"{"code":422,"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(parse_error_message("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn test_user_mapping_prefers_name_over_full_name() {
        let user: GoTrueUser = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "a@b.co",
            "user_metadata": { "name": "Short", "full_name": "Long Name" }
        }))
        .unwrap();
        let user = User::from(user);
        assert_eq!(user.name.as_deref(), Some("Short"));
        assert_eq!(user.avatar_url, None);
    }

    #[tokio::test]
    async fn test_password_sign_in_and_user_lookup() {
        let client = client_for(&fake_gotrue().await);

        let session = client
            .sign_in_with_password("ada@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(session.user.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(session.access_token.expose_secret(), "token-123");
        assert!(session.expires_at.is_some());

        // Served from the cache filled by the sign-in
        let user = client.get_user("token-123").await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada Lovelace"));

        client.inner.users.invalidate("token-123").await;
        let user = client.get_user("token-123").await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.avatar_url.as_deref(), Some("https://a/b.png"));
    }

    #[tokio::test]
    async fn test_wrong_password_surfaces_service_message() {
        let client = client_for(&fake_gotrue().await);
        let err = client
            .sign_in_with_password("ada@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.service_message(), Some("Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_unknown_token_is_expired() {
        let client = client_for(&fake_gotrue().await);
        assert!(matches!(
            client.get_user("nope").await,
            Err(AuthError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn test_pkce_exchange() {
        let client = client_for(&fake_gotrue().await);
        assert!(client.exchange_code_for_session("good-code", "v").await.is_ok());
        assert!(client.exchange_code_for_session("bad-code", "v").await.is_err());
    }

    #[tokio::test]
    async fn test_sign_up_requiring_confirmation() {
        let client = client_for(&fake_gotrue().await);
        let result = client
            .sign_up("New", "new@example.com", "pw123456", "http://localhost:3000")
            .await
            .unwrap();
        match result {
            SignUp::ConfirmationRequired(user) => assert_eq!(user.email, "new@example.com"),
            SignUp::SignedIn(_) => panic!("expected confirmation to be required"),
        }
    }
}
