//! Serves prerendered HTML to search-engine crawlers.
//!
//! Requests whose `User-Agent` looks like a known crawler are answered from
//! the prerender output directory when a matching file exists. Everyone
//! else, and every miss, falls through to the live routes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::{Regex, RegexBuilder};

/// Response header marking a prerendered answer.
pub const PRERENDERED_HEADER: &str = "x-prerendered";

const BOT_PATTERN: &str = r"googlebot|bingbot|yandex(bot|images|metrika|mobilebot|direct)?|baiduspider|duckduckbot|slurp|facebookexternalhit|twitterbot|linkedinbot|telegrambot|whatsapp|applebot|petalbot|mail\.ru_bot|semrushbot|ahrefsbot";

static BOT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(BOT_PATTERN)
        .case_insensitive(true)
        .build()
        .expect("crawler pattern is a valid regex")
});

/// Whether a `User-Agent` belongs to a known crawler.
#[must_use]
pub fn is_bot(user_agent: &str) -> bool {
    BOT_REGEX.is_match(user_agent)
}

/// Map a request path to a file relative to the prerender directory.
///
/// `/` maps to `index.html`, `/x` and `/x/` to `x/index.html`, and a last
/// segment with an extension is used as-is. Paths that could escape the
/// directory never map.
#[must_use]
pub fn prerendered_file(path: &str) -> Option<PathBuf> {
    if path.contains("..") || path.contains('\\') || path.contains('\0') {
        return None;
    }

    let inner = path.strip_prefix('/').unwrap_or(path);
    let trimmed = inner.strip_suffix('/').unwrap_or(inner);
    if trimmed.is_empty() {
        return Some(PathBuf::from("index.html"));
    }
    if trimmed.split('/').any(str::is_empty) {
        return None;
    }

    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if !path.ends_with('/') && last.contains('.') {
        Some(PathBuf::from(trimmed))
    } else {
        Some(Path::new(trimmed).join("index.html"))
    }
}

/// `Content-Type` for a served file, by extension.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Root directory of the prerender output.
#[derive(Debug, Clone)]
pub struct PrerenderedDir(Arc<Path>);

impl PrerenderedDir {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self(Arc::from(dir.as_ref()))
    }
}

/// Answer crawler `GET`/`HEAD` requests from prerendered files.
pub async fn prerendered_middleware(
    State(dir): State<PrerenderedDir>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    if method != Method::GET && method != Method::HEAD {
        return next.run(request).await;
    }

    let from_bot = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_bot);
    if !from_bot {
        return next.run(request).await;
    }

    let Some(relative) = prerendered_file(request.uri().path()) else {
        return next.run(request).await;
    };
    let file = dir.0.join(&relative);

    match tokio::fs::read(&file).await {
        Ok(bytes) => {
            tracing::debug!(path = %request.uri().path(), file = %file.display(), "Serving prerendered page");
            let body = if method == Method::HEAD {
                Body::empty()
            } else {
                Body::from(bytes)
            };
            (
                [
                    (
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(content_type_for(&relative)),
                    ),
                    (
                        header::HeaderName::from_static(PRERENDERED_HEADER),
                        HeaderValue::from_static("1"),
                    ),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!(file = %file.display(), error = %e, "No prerendered file, falling through");
            next.run(request).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::to_bytes, http::StatusCode, middleware, routing::post};
    use tower::ServiceExt;

    use super::*;

    const GOOGLEBOT: &str =
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    #[test]
    fn test_is_bot() {
        assert!(is_bot(GOOGLEBOT));
        assert!(is_bot("Mozilla/5.0 (compatible; YandexBot/3.0)"));
        assert!(is_bot("TelegramBot (like TwitterBot)"));
        assert!(is_bot("Mozilla/5.0 (compatible; Mail.RU_Bot/2.0)"));
        assert!(is_bot("WhatsApp/2.23.20"));
        assert!(!is_bot(FIREFOX));
        assert!(!is_bot(""));
    }

    #[test]
    fn test_prerendered_file_mapping() {
        assert_eq!(prerendered_file("/"), Some(PathBuf::from("index.html")));
        assert_eq!(prerendered_file("/parts"), Some(PathBuf::from("parts/index.html")));
        assert_eq!(prerendered_file("/parts/"), Some(PathBuf::from("parts/index.html")));
        assert_eq!(
            prerendered_file("/brands/bmw"),
            Some(PathBuf::from("brands/bmw/index.html"))
        );
        assert_eq!(prerendered_file("/sitemap.xml"), Some(PathBuf::from("sitemap.xml")));
        assert_eq!(prerendered_file("/../etc/passwd"), None);
        assert_eq!(prerendered_file("/a/..%2f/b"), None);
        assert_eq!(prerendered_file("/a\\b"), None);
        assert_eq!(prerendered_file("//etc"), None);
    }

    fn app(dir: &Path) -> Router {
        Router::new()
            .route("/api/orders", post(|| async { "api" }))
            .fallback(|| async { "live" })
            .layer(middleware::from_fn_with_state(
                PrerenderedDir::new(dir),
                prerendered_middleware,
            ))
    }

    async fn call(app: Router, method: Method, path: &str, ua: &str) -> (Response, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::USER_AGENT, ua)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        (
            Response::from_parts(parts, Body::empty()),
            String::from_utf8(bytes.to_vec()).unwrap(),
        )
    }

    fn dist() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>home</html>").unwrap();
        std::fs::create_dir_all(dir.path().join("contact")).unwrap();
        std::fs::write(dir.path().join("contact/index.html"), "<html>contact</html>").unwrap();
        std::fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_bot_gets_prerendered_page() {
        let dir = dist();
        let (response, body) = call(app(dir.path()), Method::GET, "/contact", GOOGLEBOT).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[PRERENDERED_HEADER], "1");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body, "<html>contact</html>");
    }

    #[tokio::test]
    async fn test_bot_gets_file_with_extension() {
        let dir = dist();
        let (response, body) = call(app(dir.path()), Method::GET, "/robots.txt", GOOGLEBOT).await;
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(body, "User-agent: *");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = dist();
        let (response, body) = call(app(dir.path()), Method::HEAD, "/", GOOGLEBOT).await;
        assert_eq!(response.headers()[PRERENDERED_HEADER], "1");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_humans_fall_through() {
        let dir = dist();
        let (response, body) = call(app(dir.path()), Method::GET, "/contact", FIREFOX).await;
        assert!(response.headers().get(PRERENDERED_HEADER).is_none());
        assert_eq!(body, "live");
    }

    #[tokio::test]
    async fn test_missing_file_falls_through() {
        let dir = dist();
        let (response, body) = call(app(dir.path()), Method::GET, "/order", GOOGLEBOT).await;
        assert!(response.headers().get(PRERENDERED_HEADER).is_none());
        assert_eq!(body, "live");
    }

    #[tokio::test]
    async fn test_post_falls_through() {
        let dir = dist();
        let (_, body) = call(app(dir.path()), Method::POST, "/api/orders", GOOGLEBOT).await;
        assert_eq!(body, "api");
    }
}
