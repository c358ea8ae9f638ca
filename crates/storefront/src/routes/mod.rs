//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page with gallery (?collection=)
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check
//!
//! # Photos
//! GET  /photos/{id}               - Photo detail with quick preview
//! GET  /photos/{id}/customize     - Print customizer (preview fragment for HTMX)
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add a customized print
//! POST /cart/update               - Change a line's quantity
//! POST /cart/remove               - Remove a line
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout?step=            - Wizard step
//! POST /checkout/cart             - Accept the cart
//! POST /checkout/payment          - Choose a payment method
//! POST /checkout/payment/fail     - Simulate a declined payment
//! POST /checkout/payment/retry    - Dismiss the payment error
//! POST /checkout/payment/change   - Dismiss the error, pick another method
//! POST /checkout/shipping         - Choose shipping, packing, insurance
//! POST /checkout/contact          - Submit contact details
//! POST /checkout/guest            - Place the order without an account
//! POST /checkout/back             - Previous step
//! POST /checkout/finish           - Start over after the confirmation
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action
//! GET  /auth/forgot-password      - Password reset request page
//! POST /auth/forgot-password      - Send password reset email
//! POST /auth/logout               - Logout action
//! POST /auth/social/{provider}    - Redirect to the OAuth provider
//! GET  /auth/callback             - OAuth callback
//!
//! # Account (requires auth)
//! GET  /account/profile           - Profile form
//! POST /account/profile           - Update display name
//! GET  /account/orders            - Order history
//!
//! # Pages
//! GET  /about                     - About page
//! GET  /contact                   - Contact form
//! POST /contact                   - Send a contact message
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod home;
pub mod pages;
pub mod photos;

use axum::{
    Router,
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware,
    routing::{get, post},
};
use photoart_core::{Cart, User};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tower_sessions::Session;

use crate::middleware::{
    OptionalAuth, auth_rate_limiter, create_session_layer, request_id_middleware,
    security_headers_middleware,
};
use crate::models::session;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Cache policy for `/static`. Fingerprinted copies under `derived/` never
/// change, so a long lifetime is safe for them too.
const STATIC_CACHE_CONTROL: &str = "public, max-age=86400";

/// Data every page needs for the header: who is signed in and how many
/// prints are in the cart.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<User>,
    pub cart_count: u32,
}

impl Layout {
    /// Layout for a page that has already loaded the cart.
    #[must_use]
    pub fn new(auth: &OptionalAuth, cart: &Cart) -> Self {
        Self {
            user: auth.user().cloned(),
            cart_count: cart.print_count(),
        }
    }

    /// Layout for a page that does not otherwise need the cart.
    pub async fn load(session: &Session, auth: &OptionalAuth) -> Self {
        let cart = session::load_cart(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load cart for header");
            Cart::new()
        });
        Self::new(auth, &cart)
    }

    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Whether the request was issued by HTMX and expects a fragment.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// Create the photo routes router.
pub fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(photos::show))
        .route("/{id}/customize", get(photos::customize))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/cart", post(checkout::submit_cart))
        .route("/payment", post(checkout::submit_payment))
        .route("/payment/fail", post(checkout::fail_payment))
        .route("/payment/retry", post(checkout::retry_payment))
        .route("/payment/change", post(checkout::change_payment_method))
        .route("/shipping", post(checkout::submit_shipping))
        .route("/contact", post(checkout::submit_contact))
        .route("/guest", post(checkout::continue_as_guest))
        .route("/back", post(checkout::back))
        .route("/finish", post(checkout::finish))
}

/// Create the auth routes router.
///
/// Credential posts share one per-IP rate limiter.
pub fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(limiter.clone())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(limiter.clone())),
        )
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).merge(post(auth::forgot_password).layer(limiter)),
        )
        .route("/logout", post(auth::logout))
        .route("/social/{provider}", post(auth::social_login))
        .route("/callback", get(auth::callback))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::profile).post(account::update_profile),
        )
        .route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/about", get(pages::about))
        .route("/contact", get(contact::show).post(contact::submit))
        .nest("/photos", photo_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
}

/// Build the complete application: routes, static files, sessions, and the
/// middleware stack. Sentry layers are added by the binary.
pub fn build_router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .merge(routes())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(STATIC_CACHE_CONTROL),
                ))
                .service(ServeDir::new(STATIC_DIR)),
        )
        .fallback(pages::not_found)
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
