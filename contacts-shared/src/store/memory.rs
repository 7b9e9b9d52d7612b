//! In-memory store implementation for testing and local development.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::contact::{Contact, ContactFilter, CreateContact, UpdateContact};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{Store, StoreError, StoreResult};

/// In-memory store.
///
/// IDs are allocated from per-table counters starting at 1, so they behave
/// like `BIGSERIAL` columns. Contacts are kept in a `BTreeMap` so searches
/// come back in ID order.
#[derive(Debug)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    contacts: Arc<RwLock<BTreeMap<i64, Contact>>>,
    next_user_id: AtomicI64,
    next_contact_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            users: Arc::default(),
            contacts: Arc::default(),
            next_user_id: AtomicI64::new(1),
            next_contact_id: AtomicI64::new(1),
        }
    }
}

impl MemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == data.username) {
            return Err(StoreError::already_exists("User", "username"));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username: data.username,
            password_hash: data.password_hash,
            name: data.name,
            token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn set_user_token(&self, id: i64, token: Option<&str>) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };

        user.token = token.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn create_contact(&self, data: CreateContact) -> StoreResult<Contact> {
        if !self.users.read().await.contains_key(&data.user_id) {
            return Err(StoreError::Other(format!(
                "User {} does not exist",
                data.user_id
            )));
        }

        let now = Utc::now();
        let contact = Contact {
            id: self.next_contact_id.fetch_add(1, Ordering::SeqCst),
            user_id: data.user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            created_at: now,
            updated_at: now,
        };
        self.contacts
            .write()
            .await
            .insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn find_contact(&self, user_id: i64, id: i64) -> StoreResult<Option<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&id).filter(|c| c.user_id == user_id).cloned())
    }

    async fn update_contact(
        &self,
        user_id: i64,
        id: i64,
        data: UpdateContact,
    ) -> StoreResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        let Some(contact) = contacts.get_mut(&id).filter(|c| c.user_id == user_id) else {
            return Ok(None);
        };

        contact.first_name = data.first_name;
        contact.last_name = data.last_name;
        contact.email = data.email;
        contact.phone = data.phone;
        contact.updated_at = Utc::now();

        Ok(Some(contact.clone()))
    }

    async fn delete_contact(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let mut contacts = self.contacts.write().await;
        if contacts.get(&id).is_some_and(|c| c.user_id == user_id) {
            contacts.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn search_contacts(
        &self,
        user_id: i64,
        filter: &ContactFilter,
    ) -> StoreResult<(Vec<Contact>, i64)> {
        let contacts = self.contacts.read().await;
        let matching: Vec<&Contact> = contacts
            .values()
            .filter(|c| c.user_id == user_id && filter.matches(c))
            .collect();

        let total = matching.len() as i64;
        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.size as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
