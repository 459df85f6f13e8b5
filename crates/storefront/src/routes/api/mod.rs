//! JSON API handlers.
//!
//! Request bodies and responses are camelCase JSON. Every failure is an
//! [`AppError`], so error bodies always carry a `message`.

pub mod auth;
pub mod contact;
pub mod orders;
pub mod password;
pub mod profile;

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection is an [`AppError`] (400 `{message}`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
