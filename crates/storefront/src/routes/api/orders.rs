//! Order API: place (signed-in or guest), list, fetch.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tower_sessions::Session;
use tracing::instrument;

use autoparts_core::{GuestOrderInput, OrderInput};

use super::ApiJson;
use crate::error::Result;
use crate::middleware::{RequireAuth, establish_session};
use crate::models::Order;
use crate::routes::parse_order_id;
use crate::services::orders::{GuestCheckout, OrderService};
use crate::state::AppState;

/// `POST /api/orders`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<OrderInput>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderService::new(state.pool(), state.mailer())
        .place_for_user(user.id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `POST /api/guest-order`
///
/// With `createAccount` the new account is signed in before responding.
#[instrument(skip_all, fields(create_account = input.create_account))]
pub async fn create_guest(
    State(state): State<AppState>,
    session: Session,
    ApiJson(input): ApiJson<GuestOrderInput>,
) -> Result<(StatusCode, Json<GuestCheckout>)> {
    let checkout = OrderService::new(state.pool(), state.mailer())
        .place_guest(&input)
        .await?;

    if let Some(user) = &checkout.user {
        establish_session(&session, user).await?;
    }

    Ok((StatusCode::CREATED, Json(checkout)))
}

/// `GET /api/orders`: the caller's orders, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool(), state.mailer())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}`
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;
    let order = OrderService::new(state.pool(), state.mailer())
        .get_for_user(user.id, id)
        .await?;
    Ok(Json(order))
}
