//! Integration test harness for the PhotoArt storefront.
//!
//! Each test spawns the full router on an ephemeral port with the mock
//! identity backend, then drives it over real HTTP with a cookie-carrying
//! client. Redirects are not followed so tests can assert on them.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p photoart-integration-tests
//! ```

use std::net::SocketAddr;

use photoart_storefront::config::StorefrontConfig;
use photoart_storefront::routes::build_router;
use photoart_storefront::state::AppState;
use reqwest::{Client, Response, StatusCode, header};

/// A running storefront plus a browser-like client.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Start the storefront on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let app = build_router(AppState::new(StorefrontConfig::local()));
        tokio::spawn(serve(listener, app));

        Self {
            base_url: format!("http://{addr}"),
            client: Self::client(),
        }
    }

    /// A second visitor against the same server, with its own cookie jar.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: Self::client(),
        }
    }

    fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET a path as an HTMX request.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn get_fragment(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header("HX-Request", "true")
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// GET a path and return its status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request or body read fails.
    pub async fn page(&self, path: &str) -> (StatusCode, String) {
        let resp = self.get(path).await;
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// Add a print of `photo_id` with default options except quantity.
    ///
    /// # Panics
    ///
    /// Panics unless the add redirects to the cart.
    pub async fn add_to_cart(&self, photo_id: &str, quantity: u32) {
        let quantity = quantity.to_string();
        let resp = self
            .post_form(
                "/cart/add",
                &[("photo_id", photo_id), ("quantity", quantity.as_str())],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/cart");
    }

    /// Sign in through the login form with the mock backend.
    ///
    /// # Panics
    ///
    /// Panics unless the login redirects.
    pub async fn login(&self, redirect_to: &str) {
        let resp = self
            .post_form(
                "/auth/login",
                &[
                    ("email", "user@example.com"),
                    ("password", "password123"),
                    ("redirect_to", redirect_to),
                ],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }
}

async fn serve(listener: tokio::net::TcpListener, app: axum::Router) {
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Test server failed");
}

/// The `Location` header of a redirect.
///
/// # Panics
///
/// Panics if the header is missing or not UTF-8.
#[must_use]
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("Response has no Location header")
        .to_str()
        .expect("Location header is not UTF-8")
        .to_string()
}

/// Path and query of an absolute or relative URL.
///
/// # Panics
///
/// Panics if `url` is neither a path nor a valid absolute URL.
#[must_use]
pub fn path_and_query(url: &str) -> String {
    if url.starts_with('/') {
        return url.to_string();
    }
    let parsed = url::Url::parse(url).expect("Invalid redirect URL");
    match parsed.query() {
        Some(query) => format!("{}?{query}", parsed.path()),
        None => parsed.path().to_string(),
    }
}
