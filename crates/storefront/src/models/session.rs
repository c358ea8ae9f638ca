//! Session-related types.
//!
//! Everything a visitor accumulates lives in their server-side session: the
//! cart, the checkout wizard, and the identity service tokens.

use photoart_core::Cart;
use photoart_core::checkout::CheckoutSession;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::auth::AuthSession;

/// Identity service tokens kept in the session.
///
/// The user record itself is looked up per request from the access token, so
/// a revoked token signs the visitor out on their next request.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredAuth {
    access_token: String,
    refresh_token: Option<String>,
    /// Unix timestamp at which the access token expires.
    pub expires_at: Option<i64>,
}

impl StoredAuth {
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Whether the access token has passed its expiry time.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl From<&AuthSession> for StoredAuth {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            expires_at: session.expires_at,
        }
    }
}

impl std::fmt::Debug for StoredAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAuth")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl StoredAuth {
    /// The access token wrapped for handing to an HTTP client.
    #[must_use]
    pub fn secret(&self) -> SecretString {
        SecretString::from(self.access_token.as_str())
    }
}

/// Session keys.
pub mod keys {
    /// Identity service tokens of the signed-in user.
    pub const AUTH: &str = "auth";

    /// The visitor's cart.
    pub const CART: &str = "cart";

    /// Checkout wizard state.
    pub const CHECKOUT: &str = "checkout";

    /// OAuth state parameter (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// PKCE code verifier for the pending OAuth exchange.
    pub const PKCE_VERIFIER: &str = "pkce_verifier";

    /// Path to return to after signing in.
    pub const AUTH_REDIRECT_TO: &str = "auth_redirect_to";
}

/// Load the visitor's cart, empty if none was stored yet.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Persist a cart the visitor edited and invalidate checkout progress made
/// against the old contents.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn save_edited_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    save_cart(session, cart).await?;
    let mut checkout = load_checkout(session).await?;
    if checkout.cart_changed() {
        tracing::debug!("Cart changed, checkout progress reset");
        save_checkout(session, &checkout).await?;
    }
    Ok(())
}

/// Load the checkout wizard state, fresh if none was stored yet.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_checkout(
    session: &Session,
) -> Result<CheckoutSession, tower_sessions::session::Error> {
    Ok(session
        .get::<CheckoutSession>(keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Persist the checkout wizard state.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_checkout(
    session: &Session,
    checkout: &CheckoutSession,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CHECKOUT, checkout).await
}
