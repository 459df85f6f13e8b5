//! Storefront configuration loaded from environment variables.
//!
//! Built once at start-up and shared read-only through [`crate::state::AppState`];
//! the email notifier and the page renderer receive it by reference.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_BASE_URL` / `PUBLIC_BASE_URL` / `RENDER_EXTERNAL_HOSTNAME` - Public URL,
//!   tried in that order, finally `http://localhost:{port}`
//! - `STOREFRONT_DIST_DIR` - Prerendered output directory (default: dist/public)
//! - `MAIL_API_KEY` - Transactional mail API key (unset: emails are only logged)
//! - `MAIL_API_URL` - Mail API endpoint (default: <https://api.resend.com/emails>)
//! - `MAIL_FROM_ORDERS` - Sender for order and contact notifications
//! - `MAIL_FROM_NOREPLY` - Sender for password reset emails
//! - `MAIL_ADMIN_ADDRESS` - Store owner address receiving notifications
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_FROM_ORDERS: &str = "Автозапчасти <orders@autoparts.example>";
const DEFAULT_FROM_NOREPLY: &str = "Автозапчасти <noreply@autoparts.example>";
const DEFAULT_ADMIN_ADDRESS: &str = "owner@autoparts.example";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL without trailing slash (links in emails, canonical URLs)
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Directory holding prerendered pages and the asset manifest
    pub dist_dir: PathBuf,
    /// Outbound mail configuration
    pub mail: MailConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Transactional mail configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MailConfig {
    /// API key; `None` switches the notifier to log-only mode
    pub api_key: Option<SecretString>,
    /// HTTP endpoint accepting `{from, to, subject, html}`
    pub api_url: String,
    /// Sender for order confirmations and contact notifications
    pub from_orders: String,
    /// Sender for password reset emails
    pub from_noreply: String,
    /// Store owner address receiving notifications
    pub admin_address: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("from_orders", &self.from_orders)
            .field("from_noreply", &self.from_noreply)
            .field("admin_address", &self.admin_address)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_MAIL_API_URL.to_string(),
            from_orders: DEFAULT_FROM_ORDERS.to_string(),
            from_noreply: DEFAULT_FROM_NOREPLY.to_string(),
            admin_address: DEFAULT_ADMIN_ADDRESS.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = resolve_base_url(port)?;
        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            dist_dir: dist_dir_from_env(),
            mail: MailConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl MailConfig {
    /// Load mail settings; every variable is optional.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: get_optional_env("MAIL_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .map(SecretString::from),
            api_url: get_optional_env("MAIL_API_URL").unwrap_or(defaults.api_url),
            from_orders: get_optional_env("MAIL_FROM_ORDERS").unwrap_or(defaults.from_orders),
            from_noreply: get_optional_env("MAIL_FROM_NOREPLY").unwrap_or(defaults.from_noreply),
            admin_address: get_optional_env("MAIL_ADMIN_ADDRESS")
                .unwrap_or(defaults.admin_address),
        }
    }
}

/// Output directory for prerendered pages (`STOREFRONT_DIST_DIR`).
#[must_use]
pub fn dist_dir_from_env() -> PathBuf {
    PathBuf::from(get_env_or_default("STOREFRONT_DIST_DIR", "dist/public"))
}

/// Resolve the public base URL from the environment fallback chain.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the chosen value is not an
/// absolute http(s) URL.
pub fn resolve_base_url(port: u16) -> Result<String, ConfigError> {
    let candidates = [
        ("STOREFRONT_BASE_URL", get_optional_env("STOREFRONT_BASE_URL")),
        ("PUBLIC_BASE_URL", get_optional_env("PUBLIC_BASE_URL")),
        (
            "RENDER_EXTERNAL_HOSTNAME",
            get_optional_env("RENDER_EXTERNAL_HOSTNAME").map(|host| format!("https://{host}")),
        ),
    ];
    let (source, raw) = candidates
        .into_iter()
        .find_map(|(key, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (key, v)))
        .unwrap_or(("default", format!("http://localhost:{port}")));

    normalize_base_url(&raw).map_err(|reason| ConfigError::InvalidEnvVar(source.to_string(), reason))
}

/// Validate a base URL and strip its trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme: {}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("base URL must have a host".to_string());
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Join a base URL and a site path.
#[must_use]
pub fn absolute_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() || path == "/" {
        format!("{base}/")
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("changeme-session-key", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(20), "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_normalize_base_url_strips_slash() {
        assert_eq!(
            normalize_base_url("https://zapchasti.ru/").unwrap(),
            "https://zapchasti.ru"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000").unwrap(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(normalize_base_url("zapchasti.ru").is_err());
        assert!(normalize_base_url("ftp://zapchasti.ru").is_err());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("https://a.ru", "/"), "https://a.ru/");
        assert_eq!(absolute_url("https://a.ru/", "/parts"), "https://a.ru/parts");
        assert_eq!(absolute_url("https://a.ru", "contact"), "https://a.ru/contact");
    }

    #[test]
    fn test_mail_config_debug_redacts_key() {
        let config = MailConfig {
            api_key: Some(SecretString::from("re_live_super_private")),
            ..MailConfig::default()
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("re_live_super_private"));
        assert!(debug_output.contains("owner@autoparts.example"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            dist_dir: PathBuf::from("dist/public"),
            mail: MailConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.port(), 5000);
        assert!(!config.is_https());
        assert_eq!(
            absolute_url(&config.base_url, "/contact"),
            "http://localhost:5000/contact"
        );
    }
}
