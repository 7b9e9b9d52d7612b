/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, logout and the current user's profile
/// - `contacts`: Contact CRUD and search for the current user
///
/// Successful responses are wrapped in [`Data`] so every body has the shape
/// `{ "data": ... }`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub mod contacts;
pub mod health;
pub mod users;

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
