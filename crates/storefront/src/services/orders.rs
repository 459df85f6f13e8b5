//! Order placement.
//!
//! Orders are written first and the owner notification is queued after, so
//! a mail failure never loses an order.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use autoparts_core::{
    GuestOrderInput, OrderId, OrderInput, OrderStatus, UserId, Validate, ValidationErrors,
};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::error::AppError;
use crate::models::{NewOrder, Order, User};
use crate::services::auth::{AuthError, AuthService};
use crate::services::email::Mailer;

/// Message for a guest checkout that tries to reuse a registered email.
pub const EMAIL_TAKEN_MESSAGE: &str =
    "Пользователь с таким email уже существует. Войдите, чтобы оформить заказ";

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("email already registered")]
    EmailTaken,

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another user")]
    Forbidden,

    #[error("account creation failed: {0}")]
    Auth(AuthError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<AuthError> for OrderError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::UserAlreadyExists => Self::EmailTaken,
            AuthError::Validation(errors) => Self::Validation(errors),
            other => Self::Auth(other),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::Validation(errors) => Self::Validation(errors),
            OrderError::EmailTaken => Self::Conflict {
                message: EMAIL_TAKEN_MESSAGE.to_string(),
                field: Some("email"),
            },
            OrderError::NotFound => Self::NotFound("Заказ не найден".to_string()),
            OrderError::Forbidden => Self::Forbidden("Нет доступа к этому заказу".to_string()),
            OrderError::Auth(e) => Self::Auth(e),
            OrderError::Repository(e) => Self::Database(e),
        }
    }
}

/// Result of a guest checkout; also the `POST /api/guest-order` body.
#[derive(Debug, Serialize)]
pub struct GuestCheckout {
    pub order: Order,
    /// The account created alongside the order, if one was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
    mailer: &'a Mailer,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a Mailer) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
            mailer,
        }
    }

    /// Place an order for a signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if the input is invalid.
    pub async fn place_for_user(
        &self,
        user_id: UserId,
        input: &OrderInput,
    ) -> Result<Order, OrderError> {
        input.validate()?;
        self.persist(&NewOrder::from_input(input, Some(user_id))).await
    }

    /// Place an order without a session, optionally creating an account.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if the input is invalid, including a
    /// missing email or password when an account is requested.
    /// Returns `OrderError::EmailTaken` if the account email is registered.
    pub async fn place_guest(&self, input: &GuestOrderInput) -> Result<GuestCheckout, OrderError> {
        input.validate()?;

        let user = if input.create_account {
            let email = input.order.contact_info.parsed_email().ok_or_else(|| {
                ValidationErrors::single("contactInfo.email", "Укажите email для создания аккаунта")
            })?;
            let password = input.password.as_deref().unwrap_or_default();
            let user = AuthService::new(self.pool)
                .register_from_contact(email, password, &input.order.contact_info)
                .await?;
            tracing::info!(user_id = %user.id, "Account created at checkout");
            Some(user)
        } else {
            None
        };

        let order = self
            .persist(&NewOrder::from_input(&input.order, user.as_ref().map(|u| u.id)))
            .await?;

        Ok(GuestCheckout { order, user })
    }

    async fn persist(&self, new_order: &NewOrder) -> Result<Order, OrderError> {
        let order = self.orders.create(new_order).await?;
        tracing::info!(
            order_id = %order.id,
            user_id = ?order.user_id.map(|id| id.as_i32()),
            parts = order.parts.len(),
            "Order placed"
        );
        self.mailer.send_order_confirmation(&order);
        Ok(order)
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// One order, if `user_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    /// Returns `OrderError::Forbidden` if it belongs to someone else or to
    /// nobody.
    pub async fn get_for_user(&self, user_id: UserId, id: OrderId) -> Result<Order, OrderError> {
        let order = self.orders.get_by_id(id).await?.ok_or(OrderError::NotFound)?;
        check_owner(order, user_id)
    }
}

/// Move an order to `status`. Any transition is allowed and nobody is
/// notified.
///
/// # Errors
///
/// Returns `OrderError::NotFound` if no such order exists.
pub async fn update_status(
    pool: &PgPool,
    id: OrderId,
    status: OrderStatus,
) -> Result<Order, OrderError> {
    let order = OrderRepository::new(pool)
        .update_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => OrderError::NotFound,
            other => OrderError::Repository(other),
        })?;
    tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
    Ok(order)
}

fn check_owner(order: Order, user_id: UserId) -> Result<Order, OrderError> {
    if order.is_owned_by(user_id) {
        Ok(order)
    } else {
        Err(OrderError::Forbidden)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use chrono::Utc;

    use autoparts_core::{ContactInfo, Part, Vehicle, VehicleType};

    use super::*;

    fn order(user_id: Option<UserId>) -> Order {
        Order {
            id: OrderId::new(3),
            user_id,
            vehicle: Vehicle {
                vehicle_type: VehicleType::Commercial,
                vin: None,
                make: Some("ГАЗ".to_string()),
                model: None,
                year: None,
                engine: None,
                fuel: None,
            },
            parts: vec![Part {
                name: "Стартер".to_string(),
                quantity: 1,
                sku: None,
                brand: None,
                description: None,
            }],
            contact_info: ContactInfo {
                name: "Пётр".to_string(),
                phone: "9001234567".to_string(),
                country_code: "+7".to_string(),
                email: None,
                city: None,
                comments: None,
            },
            status: OrderStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_check() {
        let owner = UserId::new(1);
        assert!(check_owner(order(Some(owner)), owner).is_ok());
        assert!(matches!(
            check_owner(order(Some(UserId::new(2))), owner),
            Err(OrderError::Forbidden)
        ));
        assert!(matches!(
            check_owner(order(None), owner),
            Err(OrderError::Forbidden)
        ));
    }

    #[test]
    fn test_auth_errors_map_to_order_errors() {
        assert!(matches!(
            OrderError::from(AuthError::UserAlreadyExists),
            OrderError::EmailTaken
        ));
        assert!(matches!(
            OrderError::from(AuthError::PasswordHash),
            OrderError::Auth(AuthError::PasswordHash)
        ));
    }

    #[test]
    fn test_http_mapping() {
        let status = |e: OrderError| AppError::from(e).status();
        assert_eq!(status(OrderError::EmailTaken), StatusCode::CONFLICT);
        assert_eq!(status(OrderError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status(OrderError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status(OrderError::Validation(ValidationErrors::single("parts", "empty"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(OrderError::Repository(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
