//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use autoparts_core::{Email, UserId};

/// A storefront customer.
///
/// This is also the API representation: the password hash is never part of
/// it, so it cannot leak through a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Option<Email>,
    pub full_name: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
}
