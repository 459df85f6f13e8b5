//! Auto-parts storefront library.
//!
//! This crate provides the storefront functionality as a library, so the
//! server binary, the `ap-cli` tool and the tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod prerender;
pub mod routes;
pub mod services;
pub mod ssr;
pub mod state;

use std::path::Path;

use axum::{Router, extract::State, http::StatusCode, middleware as axum_middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    PrerenderedDir, create_session_layer, prerendered_middleware, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Directory of the unbundled static files, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full application router.
///
/// `static_dir` holds the unbundled sources served under `/static`; the
/// hashed build output and prerendered pages come from the configured
/// `dist_dir`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let dist_dir = state.config().dist_dir.clone();
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/assets", ServeDir::new(dist_dir.join("assets")))
        .layer(session_layer)
        .layer(axum_middleware::from_fn_with_state(
            PrerenderedDir::new(&dist_dir),
            prerendered_middleware,
        ))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::assets::AppAssets;
    use crate::config::{MailConfig, StorefrontConfig};
    use crate::services::email::{LogMailTransport, Mailer};

    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    // The pool never connects: none of these requests reach the database.
    fn test_app(dist: &Path) -> Router {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/autoparts_test"),
            host: [127, 0, 0, 1].into(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from("k8Jq2vX9pLm4Rt7wZa1Nc5Hs3Fd6Gy0B"),
            dist_dir: dist.to_path_buf(),
            mail: MailConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/autoparts_test")
            .unwrap();
        let (mailer, _) = Mailer::with_transport(MailConfig::default(), LogMailTransport, None);
        let state = AppState::new(config, pool, mailer, AppAssets::unbundled());
        app(state, Path::new(STATIC_DIR))
    }

    async fn get(dist: &Path, uri: &str, user_agent: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let request = Request::builder()
            .uri(uri)
            .header(header::USER_AGENT, user_agent)
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        let response = test_app(dist).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let dist = tempfile::tempdir().unwrap();
        let (status, _, body) = get(dist.path(), "/health", FIREFOX).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_live_page_is_full_document() {
        let dist = tempfile::tempdir().unwrap();
        let (status, headers, body) = get(dist.path(), "/brands/toyota", FIREFOX).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("x-request-id").is_some());
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains(r#"<html lang="ru">"#));
        assert!(body.contains("/static/js/app.js"));
        assert!(body.contains("Toyota"));
    }

    #[tokio::test]
    async fn test_unknown_page_is_404_document() {
        let dist = tempfile::tempdir().unwrap();
        let (status, _, body) = get(dist.path(), "/no-such-page", FIREFOX).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("noindex"));
    }

    #[tokio::test]
    async fn test_legacy_path_redirects() {
        let dist = tempfile::tempdir().unwrap();
        let (status, headers, _) = get(dist.path(), "/catalog", FIREFOX).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(headers[header::LOCATION], "/parts");
    }

    #[tokio::test]
    async fn test_dashboard_without_session_redirects_to_login() {
        let dist = tempfile::tempdir().unwrap();
        let (status, headers, _) = get(dist.path(), "/dashboard", FIREFOX).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], ssr::LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_api_without_session_is_401_json() {
        let dist = tempfile::tempdir().unwrap();
        let (status, _, body) = get(dist.path(), "/api/orders", FIREFOX).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_every_protected_api_get_is_401() {
        let dist = tempfile::tempdir().unwrap();
        for uri in ["/api/user", "/api/orders/7"] {
            let (status, headers, _) = get(dist.path(), uri, FIREFOX).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert!(headers.get(header::LOCATION).is_none());
        }
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let dist = tempfile::tempdir().unwrap();
        let (status, _, body) = get(dist.path(), "/api/nope", FIREFOX).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("message"));
    }

    #[tokio::test]
    async fn test_crawler_gets_prerendered_file() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>prerendered</html>").unwrap();

        let googlebot = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        let (status, headers, body) = get(dist.path(), "/", googlebot).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-prerendered"], "1");
        assert_eq!(body, "<html>prerendered</html>");

        let (_, headers, body) = get(dist.path(), "/", FIREFOX).await;
        assert!(headers.get("x-prerendered").is_none());
        assert!(body.starts_with("<!DOCTYPE html>"));
    }
}
