//! PostgreSQL store implementation.
//!
//! Thin adapter from the [`Store`] trait onto the model operations in
//! [`crate::models`].

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::db::pool;
use crate::models::contact::{Contact, ContactFilter, CreateContact, UpdateContact};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{Store, StoreError, StoreResult};

/// Unique constraint guarding `users.username`
const USERNAME_CONSTRAINT: &str = "users_username_unique";

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a unique violation on the username constraint to `AlreadyExists`
fn map_user_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_CONSTRAINT) {
            return StoreError::already_exists("User", "username");
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = User::create(&self.pool, data)
            .await
            .map_err(map_user_insert_error)?;
        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_token(&self.pool, token).await?)
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn set_user_token(&self, id: i64, token: Option<&str>) -> StoreResult<bool> {
        Ok(User::set_token(&self.pool, id, token).await?)
    }

    async fn create_contact(&self, data: CreateContact) -> StoreResult<Contact> {
        let contact = Contact::create(&self.pool, data).await?;
        debug!(contact_id = contact.id, user_id = contact.user_id, "Inserted contact");
        Ok(contact)
    }

    async fn find_contact(&self, user_id: i64, id: i64) -> StoreResult<Option<Contact>> {
        Ok(Contact::find_for_user(&self.pool, user_id, id).await?)
    }

    async fn update_contact(
        &self,
        user_id: i64,
        id: i64,
        data: UpdateContact,
    ) -> StoreResult<Option<Contact>> {
        Ok(Contact::update_for_user(&self.pool, user_id, id, data).await?)
    }

    async fn delete_contact(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        Ok(Contact::delete_for_user(&self.pool, user_id, id).await?)
    }

    async fn search_contacts(
        &self,
        user_id: i64,
        filter: &ContactFilter,
    ) -> StoreResult<(Vec<Contact>, i64)> {
        Ok(Contact::search(&self.pool, user_id, filter).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
