//! Domain models for storefront.
//!
//! Rows are converted into these types by the repositories in [`crate::db`];
//! handlers never see raw database rows.

pub mod contact;
pub mod order;
pub mod reset_token;
pub mod session;
pub mod user;

pub use contact::ContactMessage;
pub use order::{NewOrder, Order};
pub use reset_token::PasswordResetToken;
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
