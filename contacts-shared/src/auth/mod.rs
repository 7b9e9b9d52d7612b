/// Authentication utilities
///
/// This module provides the authentication primitives for the contacts API:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque session token generation
/// - [`session`]: Authorization header parsing and the per-request auth context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: Random UUID v4 strings, stored on the user row and
///   matched exactly
/// - **Uniform Failures**: Login and token checks never reveal which part of
///   the credential was wrong
///
/// # Example
///
/// ```no_run
/// use contacts_shared::auth::password::{hash_password, verify_password};
/// use contacts_shared::auth::token::generate_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = generate_token();
/// assert!(!token.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
pub mod token;
