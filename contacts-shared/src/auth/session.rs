/// Session resolution from request headers
///
/// The `Authorization` header carries the raw session token with no scheme
/// prefix. The token is looked up with an exact match against the stored
/// user tokens. A successful lookup yields an [`AuthContext`] that the API
/// layer places in the request extensions.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use contacts_shared::auth::session::{extract_token, AuthError};
///
/// let mut headers = HeaderMap::new();
/// assert!(matches!(extract_token(&headers), Err(AuthError::MissingCredentials)));
///
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_static("b1946ac9"));
/// assert_eq!(extract_token(&headers).unwrap(), "b1946ac9");
/// ```

use axum::http::{header, HeaderMap};

use crate::models::user::User;
use crate::store::Store;

/// Authentication context for one request
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The user whose token matched
    pub user: User,
}

impl AuthContext {
    /// ID of the authenticated user
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Error type for session resolution
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header missing, blank or not valid UTF-8
    #[error("missing credentials")]
    MissingCredentials,

    /// Token does not belong to any user
    #[error("invalid token")]
    InvalidToken,

    /// Store lookup failed
    #[error("store error: {0}")]
    StoreError(String),
}

/// Reads the raw token from the `Authorization` header
///
/// # Errors
///
/// Returns `AuthError::MissingCredentials` if the header is absent, blank or
/// not valid UTF-8
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Resolves the request's token to a user
///
/// # Errors
///
/// Returns `MissingCredentials` or `InvalidToken` for a bad credential, and
/// `StoreError` if the lookup itself fails
pub async fn authenticate(store: &dyn Store, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers)?;

    let user = store
        .find_user_by_token(token)
        .await
        .map_err(|e| AuthError::StoreError(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    Ok(AuthContext { user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::CreateUser;
    use crate::store::memory::MemoryStore;
    use axum::http::HeaderValue;

    async fn store_with_user(token: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let user = store
            .create_user(CreateUser {
                username: "test".to_string(),
                password_hash: "hash".to_string(),
                name: "Test".to_string(),
            })
            .await
            .unwrap();
        store.set_user_token(user.id, Some(token)).await.unwrap();
        store
    }

    fn headers_with(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(token));
        headers
    }

    #[test]
    fn test_extract_token_rejects_blank() {
        assert!(matches!(
            extract_token(&headers_with("   ")),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_exact_match_only() {
        let store = store_with_user("test").await;

        let context = authenticate(&store, &headers_with("test")).await.unwrap();
        assert_eq!(context.user.username, "test");
        assert_eq!(context.user_id(), context.user.id);

        for wrong in ["tes1t", "Test", "test ", "Bearer test"] {
            assert!(
                matches!(
                    authenticate(&store, &headers_with(wrong)).await,
                    Err(AuthError::InvalidToken)
                ),
                "token {wrong:?} should not authenticate"
            );
        }
    }

    #[tokio::test]
    async fn test_authenticate_without_header() {
        let store = store_with_user("test").await;
        assert!(matches!(
            authenticate(&store, &HeaderMap::new()).await,
            Err(AuthError::MissingCredentials)
        ));
    }
}
