/// Database models for the contacts service
///
/// This module contains the persisted records and their CRUD operations
/// against PostgreSQL.
///
/// # Models
///
/// - `user`: User accounts, password hashes and session tokens
/// - `contact`: Contacts owned by a single user
///
/// # Example
///
/// ```no_run
/// use contacts_shared::models::user::{User, CreateUser};
/// use contacts_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
///
/// let new_user = CreateUser {
///     username: "jane".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: "Jane Doe".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod contact;
pub mod user;
