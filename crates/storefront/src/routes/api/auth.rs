//! Account API: register, login, logout, current user.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use autoparts_core::{LoginInput, RegisterInput};

use super::ApiJson;
use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, end_session, establish_session};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// `POST /api/register`: create the account and sign it in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(state.pool()).register(&input).await?;
    establish_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<User>> {
    let user = AuthService::new(state.pool())
        .login(&input)
        .await
        .inspect_err(|e| tracing::info!(error = %e, "Login failed"))?;
    establish_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(user))
}

/// `POST /api/logout`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Json<Value>> {
    end_session(&session).await?;
    tracing::info!("User logged out");
    Ok(Json(json!({ "message": "Вы вышли из аккаунта" })))
}

/// `GET /api/user`: the signed-in user, read fresh from the database.
///
/// A session pointing at a deleted account is ended and answered with 401.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn current_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Json<User>> {
    if let Some(row) = UserRepository::new(state.pool()).get_by_id(user.id).await? {
        return Ok(Json(row));
    }

    tracing::warn!("Session refers to a missing user");
    end_session(&session).await?;
    Err(AppError::Unauthorized("Требуется авторизация".to_string()))
}
