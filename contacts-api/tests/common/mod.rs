//! Common test utilities for HTTP integration tests
//!
//! Every test gets its own router over a fresh in-memory store, so tests
//! never share users, tokens or contacts:
//! - Seeding users (password `test`) and contacts
//! - Sending JSON requests with an optional `Authorization` token
//! - Decoding JSON response bodies

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use contacts_api::{
    app::{build_router, AppState},
    config::Config,
};
use contacts_shared::{
    auth::password::hash_password,
    models::{
        contact::{Contact, CreateContact},
        user::{CreateUser, User},
    },
    store::{memory::MemoryStore, Store},
};
use serde_json::Value;
use tower::ServiceExt;

/// Password every seeded user logs in with
pub const SEEDED_PASSWORD: &str = "test";

/// Hashing is deliberately slow, so seeded users share one hash
fn seeded_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(SEEDED_PASSWORD).expect("hash seeded password"))
        .clone()
}

/// Test context containing the store and the router built over it
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

impl TestContext {
    /// Creates a router over an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Config::in_memory());

        Self {
            store,
            app: build_router(state),
        }
    }

    /// Inserts a user whose name equals the username, optionally logged in
    /// with `token`
    pub async fn seed_user(&self, username: &str, token: Option<&str>) -> User {
        let user = self
            .store
            .create_user(CreateUser {
                username: username.to_string(),
                password_hash: seeded_password_hash(),
                name: username.to_string(),
            })
            .await
            .expect("seed user");

        if let Some(token) = token {
            self.store
                .set_user_token(user.id, Some(token))
                .await
                .expect("seed token");
        }

        self.user(username).await
    }

    /// Inserts the standard `test` contact for `user_id`
    pub async fn seed_contact(&self, user_id: i64) -> Contact {
        self.store
            .create_contact(CreateContact {
                user_id,
                first_name: "test".to_string(),
                last_name: Some("test".to_string()),
                email: Some("test@mail.com".to_string()),
                phone: Some("0812312".to_string()),
            })
            .await
            .expect("seed contact")
    }

    /// Inserts a contact with only a first name
    pub async fn seed_named_contact(&self, user_id: i64, first_name: &str) -> Contact {
        self.store
            .create_contact(CreateContact {
                user_id,
                first_name: first_name.to_string(),
                last_name: None,
                email: None,
                phone: None,
            })
            .await
            .expect("seed contact")
    }

    /// Reloads a user straight from the store
    pub async fn user(&self, username: &str) -> User {
        self.store
            .find_user_by_username(username)
            .await
            .expect("load user")
            .expect("user exists")
    }

    /// Sends a request and returns the status and decoded JSON body
    ///
    /// An empty body decodes to `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }
}

/// The `{"errors":{"message":[...]}}` body for a single message
pub fn message_error(message: &str) -> Value {
    serde_json::json!({ "errors": { "message": [message] } })
}
