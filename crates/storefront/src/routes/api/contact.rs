//! `POST /api/contact`

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use autoparts_core::{ContactMessageInput, Validate};

use super::ApiJson;
use crate::db::ContactMessageRepository;
use crate::error::Result;
use crate::state::AppState;

/// Store a contact-form message and notify the store owner.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContactMessageInput>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate()?;

    let message = ContactMessageRepository::new(state.pool())
        .create(&input)
        .await?;
    tracing::info!(message_id = %message.id, "Contact message received");
    state.mailer().send_contact_notification(&message);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": message.id,
            "message": "Сообщение отправлено. Мы свяжемся с вами в ближайшее время",
        })),
    ))
}
