//! Core types for the storefront.
//!
//! This module provides type-safe wrappers and the embedded documents stored
//! on order rows.

pub mod contact;
pub mod email;
pub mod id;
pub mod status;
pub mod vehicle;

pub use contact::{ContactInfo, is_valid_country_code, is_valid_phone};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
pub use vehicle::{MAX_QUANTITY, MIN_YEAR, Part, Vehicle};
