//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # JSON API (auth-limited: ~10/min per IP)
//! POST  /api/register             - Create account, sign in (201 user)
//! POST  /api/login                - Sign in (200 user)
//! POST  /api/forgot-password      - Email a reset link (200, masked)
//! POST  /api/verify-reset-token   - Check a reset token (200 {valid:true})
//! POST  /api/reset-password       - Set a new password (200)
//!
//! # JSON API (~100/min per IP)
//! POST  /api/logout               - Sign out
//! GET   /api/user                 - Current user
//! PATCH /api/user/profile         - Update profile
//! POST  /api/orders               - Place order (signed in, 201)
//! GET   /api/orders               - Own orders, newest first
//! GET   /api/orders/{id}          - One own order (403 other owner, 404 missing)
//! POST  /api/guest-order          - Place order without session (201 {order, user?})
//! POST  /api/contact              - Contact form (201)
//!
//! # Dashboard (requires auth, otherwise redirect to /auth/login)
//! GET   /dashboard                - Order history
//! GET   /dashboard/orders/{id}    - Order detail
//! GET   /dashboard/profile        - Profile form
//!
//! # Other
//! GET   /lang/{code}?next=        - Switch language, go back
//! GET   /*                        - Public page tree (see `crate::ssr`)
//! ```

pub mod api;
pub mod dashboard;
pub mod locale;
pub mod pages;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;

use autoparts_core::OrderId;

use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Parse an order id from a path segment; anything unparsable is not found.
///
/// # Errors
///
/// Returns `AppError::NotFound` if `raw` is not a positive integer.
pub fn parse_order_id(raw: &str) -> Result<OrderId, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .map(OrderId::new)
        .ok_or_else(|| AppError::NotFound("Заказ не найден".to_string()))
}

/// Endpoints that check credentials or send mail.
pub fn auth_api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/forgot-password", post(api::password::forgot))
        .route("/verify-reset-token", post(api::password::verify))
        .route("/reset-password", post(api::password::reset))
        .layer(auth_rate_limiter())
}

/// The rest of the JSON API.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(api::auth::logout))
        .route("/user", get(api::auth::current_user))
        .route("/user/profile", patch(api::profile::update))
        .route("/orders", get(api::orders::list).post(api::orders::create))
        .route("/orders/{id}", get(api::orders::show))
        .route("/guest-order", post(api::orders::create_guest))
        .route("/contact", post(api::contact::submit))
        .layer(api_rate_limiter())
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::orders))
        .route("/orders/{id}", get(dashboard::order_detail))
        .route("/profile", get(dashboard::profile))
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not found" })),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/api",
            auth_api_routes()
                .merge(api_routes())
                .fallback(api_not_found),
        )
        .nest("/dashboard", dashboard_routes())
        .route("/lang/{code}", get(locale::switch))
        .fallback(get(pages::page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("42").ok(), Some(OrderId::new(42)));
        assert!(parse_order_id("0").is_err());
        assert!(parse_order_id("-3").is_err());
        assert!(parse_order_id("abc").is_err());
        assert!(parse_order_id("99999999999").is_err());
    }
}
