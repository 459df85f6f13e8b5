//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use autoparts_core::{ContactMessageId, Email};

/// A stored contact form message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: Option<Email>,
    pub phone: String,
    pub country_code: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
