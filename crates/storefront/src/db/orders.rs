//! Order repository.
//!
//! Vehicle, parts and contact details are stored as JSONB documents and
//! decoded back into the core types; a document that no longer parses is
//! reported as `DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use autoparts_core::{ContactInfo, OrderId, OrderStatus, Part, UserId, Vehicle};

use super::RepositoryError;
use crate::models::{NewOrder, Order};

const ORDER_COLUMNS: &str =
    "id, user_id, vehicle, parts, contact_info, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: Option<UserId>,
    vehicle: Json<Vehicle>,
    parts: Json<Vec<Part>>,
    contact_info: Json<ContactInfo>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            vehicle: row.vehicle.0,
            parts: row.parts.0,
            contact_info: row.contact_info.0,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Map a JSON decode failure inside a row to `DataCorruption`.
fn decode_error(error: sqlx::Error) -> RepositoryError {
    match error {
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::DataCorruption(format!("column {index}: {source}"))
        }
        other => RepositoryError::Database(other),
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO storefront.order (user_id, vehicle, parts, contact_info, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id)
        .bind(Json(&order.vehicle))
        .bind(Json(&order.parts))
        .bind(Json(&order.contact_info))
        .bind(OrderStatus::New.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(decode_error)?;

        Order::try_from(row)
    }

    /// Get an order by ID regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM storefront.order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(decode_error)?;

        row.map(Order::try_from).transpose()
    }

    /// All orders of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storefront.order
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(decode_error)?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Set an order's status. Any status may replace any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE storefront.order
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(decode_error)?
        .ok_or(RepositoryError::NotFound)?;

        Order::try_from(row)
    }
}
