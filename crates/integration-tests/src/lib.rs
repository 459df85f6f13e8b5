//! Integration tests for the auto-parts storefront.
//!
//! These run against a live server and database:
//!
//! ```bash
//! cargo run -p autoparts-cli -- migrate
//! cargo run -p autoparts-storefront &
//! cargo test -p autoparts-integration-tests -- --ignored
//! ```
//!
//! `STOREFRONT_BASE_URL` defaults to `http://localhost:5000`. Tests that
//! read reset tokens back need `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`).

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL of the running storefront.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A client that keeps the session cookie between requests.
///
/// Each client sends its own `x-forwarded-for` address, so parallel tests
/// get separate rate-limit buckets.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn session_client() -> Client {
    let [a, b, c, ..] = *Uuid::new_v4().as_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("valid header value"),
    );

    Client::builder()
        .cookie_store(true)
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Absolute URL for a path on the storefront.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// An email address no other test run uses.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// Registration body for `email`.
#[must_use]
pub fn register_body(email: &str, password: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "fullName": "Иван Петров",
        "phone": "9001234567",
        "countryCode": "+7",
    })
}

/// A valid order body with one part line.
#[must_use]
pub fn order_body(email: Option<&str>) -> Value {
    let mut contact = json!({
        "name": "Иван Петров",
        "phone": "9001234567",
        "countryCode": "+7",
    });
    if let Some(email) = email {
        contact["email"] = json!(email);
    }
    json!({
        "vehicle": {"type": "passenger", "make": "Toyota", "model": "Camry", "year": 2018},
        "parts": [{"name": "Тормозные колодки", "quantity": 2}],
        "contactInfo": contact,
    })
}

/// Register and sign in a fresh account on `client`, returning its email.
///
/// # Panics
///
/// Panics if the request fails or the account is not created.
#[allow(clippy::expect_used)]
pub async fn register(client: &Client, password: &str) -> String {
    let email = unique_email();
    let resp = client
        .post(url("/api/register"))
        .json(&register_body(&email, password))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    email
}

/// Connect to the storefront database.
///
/// # Panics
///
/// Panics if no database URL is set or the connection fails.
#[allow(clippy::expect_used)]
pub async fn database() -> PgPool {
    let url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STOREFRONT_DATABASE_URL or DATABASE_URL must be set");
    PgPool::connect(&url).await.expect("Failed to connect to database")
}

/// The newest reset token issued for `email`.
///
/// # Panics
///
/// Panics if the query fails or no token exists.
#[allow(clippy::expect_used)]
pub async fn latest_reset_token(pool: &PgPool, email: &str) -> String {
    sqlx::query_scalar::<_, String>(
        r"
        SELECT t.token
        FROM storefront.password_reset_token t
        JOIN storefront.user u ON u.id = t.user_id
        WHERE u.email = $1
        ORDER BY t.created_at DESC
        LIMIT 1
        ",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("No reset token issued")
}

/// How many accounts exist for `email` (compared case-insensitively).
///
/// # Panics
///
/// Panics if the query fails.
#[allow(clippy::expect_used)]
pub async fn user_count(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT count(*) FROM storefront.user WHERE email = lower($1)")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Failed to count users")
}

/// Move every reset token of `email` into the past.
///
/// # Panics
///
/// Panics if the update fails.
#[allow(clippy::expect_used)]
pub async fn expire_reset_tokens(pool: &PgPool, email: &str) {
    sqlx::query(
        r"
        UPDATE storefront.password_reset_token t
        SET expires_at = now() - interval '1 minute'
        FROM storefront.user u
        WHERE u.id = t.user_id AND u.email = $1
        ",
    )
    .bind(email)
    .execute(pool)
    .await
    .expect("Failed to expire reset tokens");
}
