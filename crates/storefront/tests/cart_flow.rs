//! End-to-end cart flow tests.
//!
//! Drives the full router in-process over the in-memory catalog and
//! `tower_sessions::MemoryStore`, passing the session cookie between
//! requests the way a browser would. No server or database needed.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use phantomtech_core::Product;
use phantomtech_core::types::{Locale, ProductId};
use phantomtech_storefront::config::StoreConfig;
use phantomtech_storefront::db::MemoryProductStore;
use phantomtech_storefront::state::AppState;
use phantomtech_storefront::{middleware, routes};

const USER_AGENT: &str = "cart-flow-test/1.0";

fn test_config() -> StoreConfig {
    StoreConfig {
        database_url: SecretString::from("postgres://unused/test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        session_secret: SecretString::from("kR8v2mQ4tY7wB1nZ5xJ9cF3hL6pD0gA2"),
        session_cookie: "phantom_session".to_string(),
        session_table: "sessions".to_string(),
        locale: Locale::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn product(id: i32, name: &str, cents: i64) -> Product {
    Product {
        product_id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::new(cents, 2),
        description: None,
        image: None,
    }
}

fn app(products: Vec<Product>) -> Router {
    let state = AppState::new(test_config(), Box::new(MemoryProductStore::new(products)));
    let session_layer = middleware::create_session_layer(MemoryStore::default(), state.config());
    routes::routes().layer(session_layer).with_state(state)
}

/// Default catalog: product 42 priced at 9.99 plus one cheaper item.
fn catalog() -> Vec<Product> {
    vec![
        product(42, "Spectral Keyboard", 999),
        product(7, "Haunt Mouse", 450),
    ]
}

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder()
        .uri(path)
        .header(header::USER_AGENT, USER_AGENT);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post(app: &Router, path: &str, cookie: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn extract_nonce(body: &str) -> String {
    let marker = "name=\"nonce\" value=\"";
    let start = body.find(marker).expect("page should embed a nonce") + marker.len();
    let end = body[start..].find('"').unwrap() + start;
    body[start..end].to_string()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

/// Visit the landing page and return (cookie, nonce).
async fn start_session(app: &Router) -> (String, String) {
    let response = get(app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let nonce = extract_nonce(&body_string(response).await);
    (cookie, nonce)
}

#[tokio::test]
async fn landing_seeds_cart_and_lists_products_by_price() {
    let many: Vec<Product> = vec![
        product(1, "Alpha", 100),
        product(2, "Bravo", 700),
        product(3, "Charlie", 300),
        product(4, "Delta", 900),
        product(5, "Echo", 500),
        product(6, "Foxtrot", 200),
        product(7, "Golf", 400),
        product(8, "Freebie", 0),
    ];
    let app = app(many);

    let response = get(&app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = body_string(response).await;

    // Six most expensive, descending; zero-priced and the cheapest are cut
    let order: Vec<usize> = ["Delta", "Bravo", "Echo", "Golf", "Charlie", "Foxtrot"]
        .iter()
        .map(|name| body.find(name).expect("product should be listed"))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert!(!body.contains("Alpha"));
    assert!(!body.contains("Freebie"));

    // An empty cart was attached to the new session
    let cart_page = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(cart_page.contains("Your cart is empty."));
}

#[tokio::test]
async fn cart_page_renders_empty_state_without_prior_visit() {
    let app = app(catalog());

    let response = get(&app, "/cart", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Your cart is empty."));
    // Even the empty page carries a fresh nonce-bearing session
    assert!(body.contains("Continue shopping"));
}

#[tokio::test]
async fn add_to_cart_redirects_and_shows_line_item() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    let response = post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=2&product_id=42&nonce={nonce}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("Spectral Keyboard"));
    assert!(body.contains("value=\"2\""));
    assert!(body.contains("$19.98"));
}

#[tokio::test]
async fn adding_same_product_twice_aggregates_one_line() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=1&product_id=42&nonce={nonce}"),
    )
    .await;
    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=2&product_id=42&nonce={nonce}"),
    )
    .await;

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert_eq!(body.matches("Spectral Keyboard").count(), 1);
    assert!(body.contains("value=\"3\""));
    assert!(body.contains("$29.97"));
}

#[tokio::test]
async fn zero_quantity_never_mutates_the_cart() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    let response = post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=0&product_id=42&nonce={nonce}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn invalid_nonce_never_mutates_the_cart() {
    let app = app(catalog());
    let (cookie, _nonce) = start_session(&app).await;

    let response = post(&app, "/cart", &cookie, "qty=2&product_id=42&nonce=bogus").await;
    assert_eq!(location(&response), "/");

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn nonce_is_bound_to_the_user_agent() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    // Same session, different user-agent: the digest no longer matches
    let request = Request::builder()
        .method("POST")
        .uri("/cart")
        .header(header::USER_AGENT, "some-other-agent/2.0")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("qty=1&product_id=42&nonce={nonce}")))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn unknown_product_redirects_home_without_mutation() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    let response = post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=1&product_id=999&nonce={nonce}"),
    )
    .await;
    assert_eq!(location(&response), "/");

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn update_to_zero_removes_the_line() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=2&product_id=42&nonce={nonce}"),
    )
    .await;

    let response = post(
        &app,
        "/cart/update",
        &cookie,
        &format!("product_id%5B%5D=42&qty%5B%5D=0&nonce={nonce}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn update_changes_quantity_and_recomputes_totals() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=1&product_id=42&nonce={nonce}"),
    )
    .await;
    post(
        &app,
        "/cart/update",
        &cookie,
        &format!("product_id%5B%5D=42&qty%5B%5D=4&nonce={nonce}"),
    )
    .await;

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("value=\"4\""));
    assert!(body.contains("$39.96"));
}

#[tokio::test]
async fn update_accepts_singular_field_names() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=1&product_id=7&nonce={nonce}"),
    )
    .await;
    post(
        &app,
        "/cart/update",
        &cookie,
        &format!("product_id=7&qty=3&nonce={nonce}"),
    )
    .await;

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("value=\"3\""));
    assert!(body.contains("$13.50"));
}

#[tokio::test]
async fn update_with_unknown_id_leaves_cart_unchanged() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=2&product_id=42&nonce={nonce}"),
    )
    .await;
    post(
        &app,
        "/cart/update",
        &cookie,
        &format!("product_id%5B%5D=999&qty%5B%5D=5&nonce={nonce}"),
    )
    .await;

    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("value=\"2\""));
    assert!(body.contains("$19.98"));
}

#[tokio::test]
async fn update_with_invalid_nonce_redirects_home() {
    let app = app(catalog());
    let (cookie, nonce) = start_session(&app).await;

    post(
        &app,
        "/cart",
        &cookie,
        &format!("qty=2&product_id=42&nonce={nonce}"),
    )
    .await;
    let response = post(
        &app,
        "/cart/update",
        &cookie,
        "product_id%5B%5D=42&qty%5B%5D=0&nonce=bogus",
    )
    .await;
    assert_eq!(location(&response), "/");

    // Cart untouched
    let body = body_string(get(&app, "/cart", Some(&cookie)).await).await;
    assert!(body.contains("value=\"2\""));
}
