//! Password reset token repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use autoparts_core::{ResetTokenId, UserId};

use super::RepositoryError;
use crate::models::PasswordResetToken;

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: ResetTokenId,
    token: String,
    user_id: UserId,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for PasswordResetToken {
    fn from(row: TokenRow) -> Self {
        Self {
            id: row.id,
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
            used: row.used,
            created_at: row.created_at,
        }
    }
}

/// Repository for password reset tokens.
pub struct PasswordResetRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PasswordResetRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a token collision.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            INSERT INTO storefront.password_reset_token (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, token, user_id, expires_at, used, created_at
            ",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "token already exists"))?;

        Ok(row.into())
    }

    /// Look a token up, whatever its state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            SELECT id, token, user_id, expires_at, used, created_at
            FROM storefront.password_reset_token
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Consume a token if it is still unused and unexpired at `now`.
    ///
    /// The check and the update are one statement, so of two concurrent
    /// callers with the same token only one gets the row back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_used(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r"
            UPDATE storefront.password_reset_token
            SET used = TRUE
            WHERE token = $1 AND used = FALSE AND expires_at > $2
            RETURNING id, token, user_id, expires_at, used, created_at
            ",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete every token whose expiry has passed, returning how many went.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM storefront.password_reset_token WHERE expires_at <= $1",
        )
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
