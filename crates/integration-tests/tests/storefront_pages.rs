//! Gallery, static pages, and cross-cutting response behavior.

#![allow(clippy::unwrap_used)]

use photoart_integration_tests::{TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;

    let (status, body) = app.page("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = app.page("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_lists_all_photos_by_default() {
    let app = TestApp::spawn().await;
    let (status, body) = app.page("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Capture the Moment, Keep it Forever"));
    assert!(body.contains("Mountain Landscape"));
    assert!(body.contains("What Our Customers Say"));
    assert!(body.contains("filter-pill active"));
}

#[tokio::test]
async fn test_collection_filter_shows_banner_and_matching_photos() {
    let app = TestApp::spawn().await;
    let (status, body) = app.page("/?collection=landscapes").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Beautiful natural scenery"));
    assert!(body.contains("Forest Path"));
}

#[tokio::test]
async fn test_unknown_collection_shows_empty_state() {
    let app = TestApp::spawn().await;
    let (status, body) = app.page("/?collection=nope").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No photos found in this collection"));
}

#[tokio::test]
async fn test_about_page() {
    let app = TestApp::spawn().await;
    let (status, body) = app.page("/about").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("My Story"));
    assert!(body.contains("Sony Alpha a7R IV"));
    assert!(body.contains("Awards &amp; Recognition"));
}

#[tokio::test]
async fn test_contact_form_validation_and_success() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/contact",
            &[("name", "Jo"), ("email", "not-an-email"), ("subject", ""), ("message", "Hi")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please enter a valid email address."));
    assert!(body.contains("Subject is required."));
    assert!(body.contains("value=\"Jo\""));

    let resp = app
        .post_form(
            "/contact",
            &[
                ("name", "Jo"),
                ("email", "jo@example.com"),
                ("subject", "Print inquiry"),
                ("message", "Do you ship to Canada?"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact?sent=1");

    let (_, body) = app.page("/contact?sent=1").await;
    assert!(body.contains("Your message has been sent successfully"));
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let app = TestApp::spawn().await;
    let (status, body) = app.page("/no/such/page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::spawn().await;
    let resp = app.get("/").await;

    let headers = resp.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers.get("x-request-id").is_some());
}
