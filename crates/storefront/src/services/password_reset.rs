//! Password reset via emailed single-use tokens.
//!
//! A token is issued on request, may be checked any number of times while
//! usable, and is consumed by a successful reset. Tokens expire one hour
//! after issue. Requests for unknown emails look exactly like successful
//! ones.

use chrono::{Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use thiserror::Error;

use autoparts_core::{
    Email, ForgotPasswordInput, ResetPasswordInput, Validate, ValidationErrors,
};

use crate::config::absolute_url;
use crate::db::{PasswordResetRepository, RepositoryError, UserRepository};
use crate::error::AppError;
use crate::models::PasswordResetToken;
use crate::services::auth::{AuthError, hash_password};
use crate::services::email::Mailer;

/// Random bytes per token; the token itself is their hex encoding.
pub const TOKEN_BYTES: usize = 32;

/// Token lifetime in minutes.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Path of the reset page the emailed link points at.
pub const RESET_PAGE_PATH: &str = "/auth/reset-password";

/// Response to every well-formed forgot-password request.
pub const MASKED_MESSAGE: &str =
    "Если аккаунт с таким email существует, мы отправили на него ссылку для сброса пароля";

/// Errors from the reset flow.
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Unknown, used, or expired token.
    #[error("invalid or expired reset token")]
    InvalidToken,

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ResetError> for AppError {
    fn from(error: ResetError) -> Self {
        match error {
            ResetError::Validation(errors) => Self::Validation(errors),
            ResetError::InvalidToken => Self::BadRequest(
                "Ссылка для сброса пароля недействительна или устарела".to_string(),
            ),
            ResetError::Auth(e) => Self::Auth(e),
            ResetError::Repository(e) => Self::Database(e),
        }
    }
}

/// A fresh 64-character hex token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// The link emailed to the user.
#[must_use]
pub fn reset_link(base_url: &str, token: &str) -> String {
    format!("{}?token={token}", absolute_url(base_url, RESET_PAGE_PATH))
}

/// Password reset service.
pub struct PasswordResetService<'a> {
    users: UserRepository<'a>,
    tokens: PasswordResetRepository<'a>,
    mailer: &'a Mailer,
    base_url: &'a str,
}

impl<'a> PasswordResetService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a Mailer, base_url: &'a str) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: PasswordResetRepository::new(pool),
            mailer,
            base_url,
        }
    }

    /// Issue a token and email the link if the account exists.
    ///
    /// Storage and mail failures are logged, never reported, so the caller
    /// always answers with [`MASKED_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns `ResetError::Validation` only if the email is missing.
    pub async fn request_reset(&self, input: &ForgotPasswordInput) -> Result<(), ResetError> {
        let raw = input.email.trim();
        if raw.is_empty() {
            return Err(ValidationErrors::single("email", "Укажите email").into());
        }

        let Ok(email) = Email::parse(raw) else {
            tracing::debug!("Password reset requested for malformed email");
            return Ok(());
        };

        if let Err(e) = self.issue(&email).await {
            tracing::error!(error = %e, "Failed to issue password reset token");
        }
        Ok(())
    }

    async fn issue(&self, email: &Email) -> Result<(), RepositoryError> {
        let Some(user) = self.users.get_by_email(email).await? else {
            tracing::info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES);
        self.tokens.create(user.id, &token, expires_at).await?;

        self.mailer
            .send_password_reset(email.as_str(), &reset_link(self.base_url, &token));
        tracing::info!(user_id = %user.id, "Password reset token issued");
        Ok(())
    }

    /// Check that a token is usable. Changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ResetError::InvalidToken` if the token is unknown, used, or
    /// expired.
    pub async fn verify(&self, token: &str) -> Result<PasswordResetToken, ResetError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ResetError::InvalidToken);
        }

        let row = self
            .tokens
            .get_by_token(token)
            .await?
            .ok_or(ResetError::InvalidToken)?;

        if row.is_usable_at(Utc::now()) {
            Ok(row)
        } else {
            Err(ResetError::InvalidToken)
        }
    }

    /// Consume the token, then set the new password.
    ///
    /// The token is claimed before the password changes, so a token can
    /// succeed at most once. Existing sessions of the user stay valid.
    ///
    /// # Errors
    ///
    /// Returns `ResetError::Validation` if the password is too short.
    /// Returns `ResetError::InvalidToken` if the token is not usable.
    pub async fn reset(&self, input: &ResetPasswordInput) -> Result<(), ResetError> {
        input.validate()?;
        let password_hash = hash_password(&input.password)?;

        let token = self
            .tokens
            .mark_used(input.token.trim(), Utc::now())
            .await?
            .ok_or(ResetError::InvalidToken)?;

        self.users
            .update_password(token.user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %token.user_id, "Password reset completed");
        Ok(())
    }
}

/// Delete expired tokens, returning how many were removed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn sweep_expired(pool: &PgPool) -> Result<u64, RepositoryError> {
    let deleted = PasswordResetRepository::new(pool)
        .delete_expired(Utc::now())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to sweep expired reset tokens"))?;
    tracing::info!(deleted, "Swept expired reset tokens");
    Ok(deleted)
}
