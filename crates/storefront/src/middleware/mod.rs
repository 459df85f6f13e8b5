//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, caching, isolation)
//! 5. Prerendered pages for crawlers
//! 6. Session layer (tower-sessions with `PostgreSQL` store)
//! 7. Rate limiting on `/api` (governor)

pub mod auth;
pub mod locale;
pub mod prerendered;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, end_session, establish_session};
pub use locale::{RequestLocale, store_locale};
pub use prerendered::{PrerenderedDir, prerendered_middleware};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
