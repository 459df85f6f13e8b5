//! Password reset API.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use autoparts_core::{ForgotPasswordInput, ResetPasswordInput, VerifyResetTokenInput};

use super::ApiJson;
use crate::error::Result;
use crate::services::password_reset::{MASKED_MESSAGE, PasswordResetService};
use crate::state::AppState;

fn service(state: &AppState) -> PasswordResetService<'_> {
    PasswordResetService::new(state.pool(), state.mailer(), &state.config().base_url)
}

/// `POST /api/forgot-password`: same answer whether or not the account exists.
#[instrument(skip_all)]
pub async fn forgot(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ForgotPasswordInput>,
) -> Result<Json<Value>> {
    service(&state).request_reset(&input).await?;
    Ok(Json(json!({ "message": MASKED_MESSAGE })))
}

/// `POST /api/verify-reset-token`
#[instrument(skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VerifyResetTokenInput>,
) -> Result<Json<Value>> {
    service(&state).verify(&input.token).await?;
    Ok(Json(json!({ "valid": true })))
}

/// `POST /api/reset-password`
#[instrument(skip_all)]
pub async fn reset(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ResetPasswordInput>,
) -> Result<Json<Value>> {
    service(&state).reset(&input).await?;
    Ok(Json(json!({ "message": "Пароль изменён. Теперь вы можете войти" })))
}
