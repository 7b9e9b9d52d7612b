//! Persistence abstraction for users and contacts.
//!
//! Handlers talk to a [`Store`] trait object so the same router runs against
//! PostgreSQL in production ([`postgres::PgStore`]) and an in-process map in
//! tests ([`memory::MemoryStore`]).
//!
//! Contact operations always take the owning user's ID. A backend must treat
//! a contact owned by another user exactly like a missing one.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::contact::{Contact, ContactFilter, CreateContact, UpdateContact};
use crate::models::user::{CreateUser, UpdateUser, User};

pub mod memory;
pub mod postgres;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field already holds this value.
    #[error("{entity_type} with this {field} already exists")]
    AlreadyExists {
        entity_type: &'static str,
        field: &'static str,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    /// Creates an already exists error.
    pub fn already_exists(entity_type: &'static str, field: &'static str) -> Self {
        Self::AlreadyExists { entity_type, field }
    }

    /// Returns true if this error reports a duplicate username.
    pub fn is_duplicate_username(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists {
                entity_type: "User",
                field: "username"
            }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for user and contact storage operations.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the username is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Gets a user by exact username.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Gets the user holding exactly this session token.
    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// Updates a user's name and/or password hash.
    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Sets or clears a user's session token.
    async fn set_user_token(&self, id: i64, token: Option<&str>) -> StoreResult<bool>;

    // =========================================================================
    // Contact operations
    // =========================================================================

    /// Creates a contact for `data.user_id`.
    async fn create_contact(&self, data: CreateContact) -> StoreResult<Contact>;

    /// Gets a contact by ID if it belongs to `user_id`.
    async fn find_contact(&self, user_id: i64, id: i64) -> StoreResult<Option<Contact>>;

    /// Replaces a contact's fields if it belongs to `user_id`.
    async fn update_contact(
        &self,
        user_id: i64,
        id: i64,
        data: UpdateContact,
    ) -> StoreResult<Option<Contact>>;

    /// Deletes a contact if it belongs to `user_id`.
    async fn delete_contact(&self, user_id: i64, id: i64) -> StoreResult<bool>;

    /// Returns one page of a user's contacts plus the total match count.
    async fn search_contacts(
        &self,
        user_id: i64,
        filter: &ContactFilter,
    ) -> StoreResult<(Vec<Contact>, i64)>;

    // =========================================================================
    // Health
    // =========================================================================

    /// Checks that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
