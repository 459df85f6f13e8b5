//! Contact message repository. Messages are never updated.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use autoparts_core::{ContactMessageId, ContactMessageInput, Email};

use super::RepositoryError;
use crate::models::ContactMessage;

#[derive(sqlx::FromRow)]
struct ContactMessageRow {
    id: ContactMessageId,
    name: String,
    email: Option<String>,
    phone: String,
    country_code: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactMessageRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactMessageRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid email: {e}")))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email,
            phone: row.phone,
            country_code: row.country_code,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact form messages.
pub struct ContactMessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactMessageRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a validated message. Blank optional email is stored as NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &ContactMessageInput,
    ) -> Result<ContactMessage, RepositoryError> {
        let email = input
            .email
            .as_deref()
            .and_then(|e| Email::parse(e).ok())
            .map(Email::into_inner);

        let row = sqlx::query_as::<_, ContactMessageRow>(
            r"
            INSERT INTO storefront.contact_message (name, email, phone, country_code, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, country_code, message, created_at
            ",
        )
        .bind(input.name.trim())
        .bind(email)
        .bind(input.phone.trim())
        .bind(input.country_code.trim())
        .bind(input.message.trim())
        .fetch_one(self.pool)
        .await?;

        ContactMessage::try_from(row)
    }

    /// Most recent messages first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ContactMessage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactMessageRow>(
            r"
            SELECT id, name, email, phone, country_code, message, created_at
            FROM storefront.contact_message
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ContactMessage::try_from).collect()
    }
}
