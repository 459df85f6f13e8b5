//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use autoparts_core::{ContactInfo, OrderId, OrderInput, OrderStatus, Part, UserId, Vehicle};

/// A parts request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner, `None` for guest orders (or after the owner was deleted).
    pub user_id: Option<UserId>,
    pub vehicle: Vehicle,
    pub parts: Vec<Part>,
    pub contact_info: ContactInfo,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether `user` may read this order.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == Some(user)
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.parts.iter().map(|p| p.quantity).sum()
    }
}

/// A validated order ready to insert.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub vehicle: Vehicle,
    pub parts: Vec<Part>,
    pub contact_info: ContactInfo,
}

impl NewOrder {
    /// Build from a validated input, normalizing every document.
    #[must_use]
    pub fn from_input(input: &OrderInput, user_id: Option<UserId>) -> Self {
        let input = input.normalized();
        Self {
            user_id,
            vehicle: input.vehicle,
            parts: input.parts,
            contact_info: input.contact_info,
        }
    }
}
