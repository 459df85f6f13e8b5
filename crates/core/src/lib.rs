//! Auto-parts storefront core - shared data shapes and validation rules.
//!
//! Every request body the storefront accepts and every row shape it returns
//! is defined here, so the HTTP handlers and the server-rendered forms agree
//! on field names and limits.
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation - no I/O, no
//! database access, no HTTP clients. The optional `postgres` feature adds
//! sqlx encode/decode support for the id newtypes.
//!
//! # Modules
//!
//! - [`types`] - Ids, email, statuses, vehicle/part/contact shapes
//! - [`validation`] - Field-level validation errors and the [`Validate`] trait
//! - [`input`] - Request inputs for every API endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod input;
pub mod types;
pub mod validation;

pub use input::*;
pub use types::*;
pub use validation::{FieldError, Validate, ValidationErrors, non_blank};
