//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email + password accounts
//! - `email` - Background notification mail
//! - `orders` - Order placement and ownership checks
//! - `password_reset` - Token-based password reset

pub mod auth;
pub mod email;
pub mod orders;
pub mod password_reset;
