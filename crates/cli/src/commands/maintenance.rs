//! Maintenance commands run by the store owner or cron.

use autoparts_core::{OrderId, OrderStatus};
use autoparts_storefront::db::ContactMessageRepository;
use autoparts_storefront::services::{orders, password_reset};

/// Delete expired password reset tokens.
///
/// # Errors
///
/// Returns error if the database is unreachable or the delete fails.
pub async fn sweep_tokens() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    password_reset::sweep_expired(&pool).await?;
    Ok(())
}

/// Set the status of order `id`.
///
/// # Errors
///
/// Returns error if the order does not exist or the update fails.
pub async fn set_order_status(id: i32, status: OrderStatus) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let order = orders::update_status(&pool, OrderId::new(id), status).await?;
    tracing::info!(order_id = %order.id, status = %order.status, "Done");
    Ok(())
}

/// Log the newest contact-form messages.
///
/// # Errors
///
/// Returns error if the database is unreachable or a stored row is invalid.
pub async fn list_messages(limit: i64) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let messages = ContactMessageRepository::new(&pool).list_recent(limit).await?;

    for message in &messages {
        tracing::info!(
            id = %message.id,
            name = %message.name,
            phone = %format_args!("{} {}", message.country_code, message.phone),
            email = message.email.as_ref().map(ToString::to_string).unwrap_or_default(),
            created_at = %message.created_at,
            "{}",
            message.message
        );
    }
    tracing::info!(count = messages.len(), "Done");
    Ok(())
}
