//! Customer dashboard, rendered live for the signed-in user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::{RequestLocale, RequireAuth, end_session};
use crate::models::{CurrentUser, User};
use crate::routes::{pages::respond, parse_order_id};
use crate::services::orders::{OrderError, OrderService};
use crate::ssr::{LOGIN_PATH, dashboard, render_not_found};
use crate::state::AppState;

/// Load the session user's row; a stale session is ended.
async fn load_user(
    state: &AppState,
    session: &Session,
    current: &CurrentUser,
) -> Result<Option<User>> {
    let user = UserRepository::new(state.pool()).get_by_id(current.id).await?;
    if user.is_none() {
        tracing::warn!(user_id = %current.id, "Session refers to a missing user");
        end_session(session).await?;
    }
    Ok(user)
}

/// `GET /dashboard`: order history.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    RequestLocale(locale): RequestLocale,
    session: Session,
) -> Result<Response> {
    let Some(user) = load_user(&state, &session, &current).await? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };
    let orders = OrderService::new(state.pool(), state.mailer())
        .list_for_user(user.id)
        .await?;

    let page = dashboard::render_orders(&state.render_context(locale, true), &user, &orders)?;
    Ok(respond(&state, &page, locale))
}

/// `GET /dashboard/orders/{id}`
///
/// Unknown ids get the not-found page; orders of other customers get the
/// same page with status 403.
#[instrument(skip_all, fields(user_id = %current.id, order_id = %id))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Response> {
    let ctx = state.render_context(locale, true);
    let path = format!("/dashboard/orders/{id}");

    let Ok(order_id) = parse_order_id(&id) else {
        return Ok(respond(&state, &render_not_found(&path, &ctx)?, locale));
    };

    let result = OrderService::new(state.pool(), state.mailer())
        .get_for_user(current.id, order_id)
        .await;
    let page = match result {
        Ok(order) => dashboard::render_order_detail(&ctx, &order)?,
        Err(OrderError::NotFound) => render_not_found(&path, &ctx)?,
        Err(OrderError::Forbidden) => {
            tracing::warn!("Order belongs to another customer");
            let mut page = render_not_found(&path, &ctx)?;
            page.status = StatusCode::FORBIDDEN;
            page
        }
        Err(e) => return Err(e.into()),
    };
    Ok(respond(&state, &page, locale))
}

/// `GET /dashboard/profile`
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    RequestLocale(locale): RequestLocale,
    session: Session,
) -> Result<Response> {
    let Some(user) = load_user(&state, &session, &current).await? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let page = dashboard::render_profile(&state.render_context(locale, true), &user)?;
    Ok(respond(&state, &page, locale))
}
