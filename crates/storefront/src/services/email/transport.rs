//! Mail delivery backends.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{EmailError, EmailKind, OutgoingEmail};

/// Upper bound on one mail API call, so a hung request cannot stall the
/// worker queue.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can deliver a rendered email.
pub trait MailTransport: Send + Sync {
    /// Deliver one email.
    fn send(&self, email: &OutgoingEmail) -> impl Future<Output = Result<(), EmailError>> + Send;
}

/// Request body accepted by the transactional mail API.
#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

/// Transactional mail API client (`POST {from, to, subject, html}` with a
/// bearer key).
#[derive(Clone)]
pub struct HttpMailTransport {
    client: reqwest::Client,
    api_url: String,
}

impl HttpMailTransport {
    /// Create a client for `api_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(api_url: &str, api_key: &SecretString) -> Result<Self, EmailError> {
        Self::with_timeout(api_url, api_key, SEND_TIMEOUT)
    }

    /// Like [`HttpMailTransport::new`] with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn with_timeout(
        api_url: &str,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, EmailError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| EmailError::InvalidKey(e.to_string()))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }
}

impl MailTransport for HttpMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let body = SendRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
        };

        let response = self.client.post(&self.api_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Logs emails instead of sending them. Used when no API key is configured.
#[derive(Clone, Copy, Default)]
pub struct LogMailTransport;

impl MailTransport for LogMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        tracing::info!(
            kind = email.kind.as_str(),
            to = ?email.to,
            subject = %email.subject,
            "Mail API key not configured, email logged only"
        );
        if let Some(html) = loggable_body(email) {
            tracing::debug!(html = %html, "Email body");
        }
        Ok(())
    }
}

// Reset emails carry a live token.
fn loggable_body(email: &OutgoingEmail) -> Option<&str> {
    match email.kind {
        EmailKind::PasswordReset => None,
        EmailKind::OrderConfirmation | EmailKind::ContactNotification => Some(&email.html),
    }
}
