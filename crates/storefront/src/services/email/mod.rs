//! Transactional email.
//!
//! Three messages exist: an order notification and a contact form
//! notification (both to the store owner) and a password reset link (to the
//! customer). Messages are rendered with askama (HTML auto-escaping covers
//! every interpolated customer value) and queued on the [`Mailer`].
//!
//! Delivery happens on a single background worker draining a bounded queue.
//! Request handlers never wait for it and never see its failures: the worker
//! logs each [`SendOutcome`] and, when asked to, publishes it on an outcome
//! channel.

mod transport;

pub use transport::{HttpMailTransport, LogMailTransport, MailTransport};

use askama::Template;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::MailConfig;
use crate::i18n::Locale;
use crate::models::{ContactMessage, Order};

/// Maximum number of emails waiting for delivery.
pub const QUEUE_CAPACITY: usize = 256;

/// Errors that can occur when rendering or sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Mail API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API key is not usable as a header value.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Which message an email is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    OrderConfirmation,
    PasswordReset,
    ContactNotification,
}

impl EmailKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderConfirmation => "order_confirmation",
            Self::PasswordReset => "password_reset",
            Self::ContactNotification => "contact_notification",
        }
    }
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub kind: EmailKind,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub kind: EmailKind,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order: &'a Order,
    vehicle_type: &'static str,
    placed_at: String,
    account: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    reset_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_notification.html")]
struct ContactNotificationHtml<'a> {
    message: &'a ContactMessage,
    received_at: String,
}

/// Render the store owner's notification about a new order.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn order_confirmation(config: &MailConfig, order: &Order) -> Result<OutgoingEmail, EmailError> {
    let account = if order.user_id.is_some() {
        "зарегистрированный клиент"
    } else {
        "гость"
    };
    let html = OrderConfirmationHtml {
        order,
        vehicle_type: Locale::Ru.vehicle_type(order.vehicle.vehicle_type),
        placed_at: format_moscow_time(order.created_at),
        account,
    }
    .render()?;

    Ok(OutgoingEmail {
        kind: EmailKind::OrderConfirmation,
        from: config.from_orders.clone(),
        to: vec![config.admin_address.clone()],
        subject: format!("Новый заказ №{}", order.id),
        html,
    })
}

/// Render a password reset link for a customer.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn password_reset(
    config: &MailConfig,
    to: &str,
    reset_url: &str,
) -> Result<OutgoingEmail, EmailError> {
    let html = PasswordResetHtml { reset_url }.render()?;

    Ok(OutgoingEmail {
        kind: EmailKind::PasswordReset,
        from: config.from_noreply.clone(),
        to: vec![to.to_string()],
        subject: "Восстановление пароля".to_string(),
        html,
    })
}

/// Render the store owner's notification about a contact form message.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn contact_notification(
    config: &MailConfig,
    message: &ContactMessage,
) -> Result<OutgoingEmail, EmailError> {
    let html = ContactNotificationHtml {
        message,
        received_at: format_moscow_time(message.created_at),
    }
    .render()?;

    Ok(OutgoingEmail {
        kind: EmailKind::ContactNotification,
        from: config.from_orders.clone(),
        to: vec![config.admin_address.clone()],
        subject: format!("Новое сообщение с сайта от {}", message.name),
        html,
    })
}

/// Timestamps in emails are shown in Moscow time (UTC+3, no DST).
fn format_moscow_time(at: chrono::DateTime<chrono::Utc>) -> String {
    const FORMAT: &str = "%d.%m.%Y %H:%M";
    chrono::FixedOffset::east_opt(3 * 3600).map_or_else(
        || format!("{} UTC", at.format(FORMAT)),
        |msk| format!("{} МСК", at.with_timezone(&msk).format(FORMAT)),
    )
}

/// Handle to the background mail worker.
///
/// Cheap to clone; all clones feed the same queue.
#[derive(Clone)]
pub struct Mailer {
    config: MailConfig,
    queue: mpsc::Sender<OutgoingEmail>,
}

impl Mailer {
    /// Start the worker with the transport the configuration calls for.
    ///
    /// With an API key emails go to the HTTP API; without one they are only
    /// logged. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn start(config: &MailConfig) -> Result<(Self, JoinHandle<()>), EmailError> {
        match &config.api_key {
            Some(key) => {
                let transport = HttpMailTransport::new(&config.api_url, key)?;
                tracing::info!(api_url = %config.api_url, "Mail delivery enabled");
                Ok(Self::with_transport(config.clone(), transport, None))
            }
            None => {
                tracing::warn!("MAIL_API_KEY not set, emails will be logged only");
                Ok(Self::with_transport(config.clone(), LogMailTransport, None))
            }
        }
    }

    /// Start a worker over an explicit transport, optionally publishing every
    /// outcome.
    pub fn with_transport<T>(
        config: MailConfig,
        transport: T,
        outcomes: Option<mpsc::UnboundedSender<SendOutcome>>,
    ) -> (Self, JoinHandle<()>)
    where
        T: MailTransport + 'static,
    {
        let (queue, receiver) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(run_worker(transport, receiver, outcomes));
        (Self { config, queue }, handle)
    }

    /// Mail settings (sender addresses, admin address).
    #[must_use]
    pub const fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Queue an email. Never blocks and never fails the caller.
    pub fn enqueue(&self, email: OutgoingEmail) {
        let kind = email.kind.as_str();
        match self.queue.try_send(email) {
            Ok(()) => tracing::debug!(kind, "Email queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(kind, "Mail queue full, email dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!(kind, "Mail worker stopped, email dropped");
            }
        }
    }

    /// Render and queue the store owner's notification about `order`.
    pub fn send_order_confirmation(&self, order: &Order) {
        match order_confirmation(&self.config, order) {
            Ok(email) => self.enqueue(email),
            Err(e) => tracing::error!(order_id = %order.id, error = %e, "Failed to render order email"),
        }
    }

    /// Render and queue a password reset link.
    pub fn send_password_reset(&self, to: &str, reset_url: &str) {
        match password_reset(&self.config, to, reset_url) {
            Ok(email) => self.enqueue(email),
            Err(e) => tracing::error!(error = %e, "Failed to render password reset email"),
        }
    }

    /// Render and queue the store owner's notification about a contact message.
    pub fn send_contact_notification(&self, message: &ContactMessage) {
        match contact_notification(&self.config, message) {
            Ok(email) => self.enqueue(email),
            Err(e) => {
                tracing::error!(message_id = %message.id, error = %e, "Failed to render contact email");
            }
        }
    }
}

async fn run_worker<T: MailTransport>(
    transport: T,
    mut receiver: mpsc::Receiver<OutgoingEmail>,
    outcomes: Option<mpsc::UnboundedSender<SendOutcome>>,
) {
    while let Some(email) = receiver.recv().await {
        let outcome = match transport.send(&email).await {
            Ok(()) => {
                tracing::info!(kind = email.kind.as_str(), to = ?email.to, "Email sent");
                SendOutcome {
                    kind: email.kind,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(kind = email.kind.as_str(), to = ?email.to, error = %e, "Email send failed");
                SendOutcome {
                    kind: email.kind,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        };

        if let Some(outcomes) = &outcomes {
            let _ = outcomes.send(outcome);
        }
    }

    tracing::debug!("Mail worker stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use autoparts_core::{
        ContactInfo, ContactMessageId, Email, OrderId, OrderStatus, Part, Vehicle, VehicleType,
    };

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    }

    impl MailTransport for RecordingTransport {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    impl MailTransport for FailingTransport {
        async fn send(&self, _email: &OutgoingEmail) -> Result<(), EmailError> {
            Err(EmailError::Api {
                status: 422,
                message: "domain not verified".to_string(),
            })
        }
    }

    fn order() -> Order {
        Order {
            id: OrderId::new(42),
            user_id: None,
            vehicle: Vehicle {
                vehicle_type: VehicleType::Chinese,
                vin: Some("LGWEF4A53MF123456".to_string()),
                make: Some("Haval".to_string()),
                model: Some("Jolion".to_string()),
                year: Some(2022),
                engine: None,
                fuel: None,
            },
            parts: vec![Part {
                name: "<b>Фильтр</b> салона".to_string(),
                quantity: 2,
                sku: None,
                brand: None,
                description: None,
            }],
            contact_info: ContactInfo {
                name: "Пётр <script>".to_string(),
                phone: "900 123-45-67".to_string(),
                country_code: "+7".to_string(),
                email: Some("petr@mail.ru".to_string()),
                city: Some("Тверь".to_string()),
                comments: None,
            },
            status: OrderStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contact_message() -> ContactMessage {
        ContactMessage {
            id: ContactMessageId::new(5),
            name: "Ivan".to_string(),
            email: None,
            phone: "+7 900 1234567".to_string(),
            country_code: "+7".to_string(),
            message: "Нужна помощь с запчастями для BMW & <Audi>".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_confirmation_goes_to_admin_and_escapes() {
        let config = MailConfig::default();
        let email = order_confirmation(&config, &order()).unwrap();

        assert_eq!(email.to, vec![config.admin_address.clone()]);
        assert_eq!(email.from, config.from_orders);
        assert_eq!(email.subject, "Новый заказ №42");
        assert!(email.html.contains("LGWEF4A53MF123456"));
        assert!(email.html.contains("Jolion"));
        assert!(!email.html.contains("<script>"));
        assert!(!email.html.contains("<b>Фильтр</b>"));
        assert!(email.html.contains("&#60;b&#62;"));
    }

    #[test]
    fn test_password_reset_goes_to_customer() {
        let config = MailConfig::default();
        let url = "https://zapchasti.ru/auth/reset-password?token=abc123";
        let email = password_reset(&config, "anna@mail.ru", url).unwrap();

        assert_eq!(email.to, vec!["anna@mail.ru".to_string()]);
        assert_eq!(email.from, config.from_noreply);
        assert!(email.html.contains("token=abc123"));
    }

    #[test]
    fn test_contact_notification_escapes_message() {
        let config = MailConfig::default();
        let email = contact_notification(&config, &contact_message()).unwrap();

        assert_eq!(email.to, vec![config.admin_address.clone()]);
        assert!(email.subject.contains("Ivan"));
        assert!(email.html.contains("&#60;Audi&#62;"));
        assert!(!email.html.contains("<Audi>"));
    }

    #[tokio::test]
    async fn test_worker_delivers_and_reports_success() {
        let transport = RecordingTransport::default();
        let sent = Arc::clone(&transport.sent);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (mailer, _handle) = Mailer::with_transport(MailConfig::default(), transport, Some(tx));

        mailer.send_contact_notification(&contact_message());

        let outcome = rx.recv().await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.kind, EmailKind::ContactNotification);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_worker_reports_failure_without_panicking() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (mailer, _handle) =
            Mailer::with_transport(MailConfig::default(), FailingTransport, Some(tx));

        mailer.send_order_confirmation(&order());
        mailer.send_password_reset(Email::parse("a@b.ru").unwrap().as_str(), "https://x.ru/r");

        let first = rx.recv().await.unwrap();
        assert!(!first.success);
        assert!(first.error.unwrap().contains("422"));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, EmailKind::PasswordReset);
        assert!(!second.success);
    }

    #[tokio::test]
    async fn test_worker_stops_when_all_handles_drop() {
        let (mailer, handle) =
            Mailer::with_transport(MailConfig::default(), LogMailTransport, None);
        drop(mailer);
        handle.await.unwrap();
    }
}
