/// Session token generation
///
/// Tokens are opaque random strings issued at login and stored verbatim on
/// the user row. They do not expire; a new login replaces the previous token
/// and logout clears it.

use uuid::Uuid;

/// Generates a new session token
///
/// The token is a hyphenated UUID v4 (122 random bits).
///
/// # Example
///
/// ```
/// use contacts_shared::auth::token::generate_token;
///
/// let token = generate_token();
/// assert_eq!(token.len(), 36);
/// ```
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}
