//! `PATCH /api/user/profile`

use axum::{Json, extract::State};
use tracing::instrument;

use autoparts_core::{ProfileUpdate, Validate};

use super::ApiJson;
use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

/// Apply a partial profile update. Email and password are not editable here.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<User>> {
    update.validate()?;
    let users = UserRepository::new(state.pool());

    let result = if update.is_empty() {
        users.get_by_id(user.id).await?.ok_or(RepositoryError::NotFound)
    } else {
        users.update_profile(user.id, &update).await
    };

    match result {
        Ok(row) => {
            tracing::info!("Profile updated");
            Ok(Json(row))
        }
        Err(RepositoryError::NotFound) => {
            Err(AppError::Unauthorized("Требуется авторизация".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
