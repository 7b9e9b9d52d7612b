//! # Contacts Shared Library
//!
//! This crate contains the data models, persistence layer and authentication
//! primitives used by the contacts API server.
//!
//! ## Module Organization
//!
//! - `models`: User and contact records with their PostgreSQL operations
//! - `auth`: Password hashing, session tokens and request auth context
//! - `db`: Connection pool management and migrations
//! - `store`: The `Store` trait with PostgreSQL and in-memory backends

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the contacts shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
