/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `ApiResult<T>`, and every failure is rendered as
///
/// ```json
/// { "errors": { "<field or 'message'>": ["...", "..."] } }
/// ```
///
/// Validation failures list every offending field. Authentication and
/// not-found failures use a single generic `message` entry so that the
/// response never reveals why a credential was rejected or whether another
/// user's record exists.

use std::collections::BTreeMap;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contacts_shared::{auth::password::PasswordError, auth::session::AuthError, store::StoreError};
use serde::{Deserialize, Serialize};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Field name to ordered list of messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Generic 401 message
pub const UNAUTHORIZED: &str = "unauthorized";

/// Generic 401 message for failed logins
pub const LOGIN_FAILED: &str = "username or password wrong";

/// Generic 404 message
pub const NOT_FOUND: &str = "not found";

/// Generic 405 message
pub const METHOD_NOT_ALLOWED: &str = "method not allowed";

/// Key used for errors that do not belong to a single field
const MESSAGE_KEY: &str = "message";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body or query (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One or more fields failed validation (400)
    #[error("Validation failed: {} fields", .0.len())]
    Validation(FieldErrors),

    /// Missing or rejected credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource missing or owned by someone else (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path exists but not for this method (405)
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: FieldErrors,
}

impl ApiError {
    /// 401 with the generic unauthorized message
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED.to_string())
    }

    /// 404 with the generic not found message
    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND.to_string())
    }

    /// 405 with the generic method not allowed message
    pub fn method_not_allowed() -> Self {
        ApiError::MethodNotAllowed(METHOD_NOT_ALLOWED.to_string())
    }

    /// 400 carrying a single message for one field
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ApiError::Validation(errors)
    }

    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn message_errors(message: String) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(MESSAGE_KEY.to_string(), vec![message]);
    errors
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let errors = match self {
            ApiError::Validation(errors) => errors,
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg) => message_errors(msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                message_errors("internal server error".to_string())
            }
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

/// Convert validator output into aggregated field errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();

        for (field, field_errors) in err.field_errors() {
            let field = field.to_string();
            let messages = field_errors.iter().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field.replace('_', " ")))
            });
            errors.entry(field.clone()).or_default().extend(messages);
        }

        ApiError::Validation(errors)
    }
}

/// Convert body parsing failures to 400
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert query string parsing failures to 400
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_duplicate_username() {
            return ApiError::field("username", "username already registered");
        }
        ApiError::InternalError(err.to_string())
    }
}

/// Convert session resolution errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::InvalidToken => ApiError::unauthorized(),
            AuthError::StoreError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::not_found();
        assert_eq!(err.to_string(), "Not found: not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::field("a", "b").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::method_not_allowed().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::InternalError("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_unauthorized_body_shape() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "errors": { "message": ["unauthorized"] } })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::InternalError("connection refused".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["errors"]["message"][0], "internal server error");
    }

    #[test]
    fn test_duplicate_username_maps_to_field_error() {
        let err = ApiError::from(StoreError::already_exists("User", "username"));
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors["username"], vec!["username already registered"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(required(message = "The first name field is required."))]
        first_name: Option<String>,

        #[validate(email(message = "The email field must be a valid email address."))]
        email: Option<String>,
    }

    #[test]
    fn test_validation_errors_are_aggregated() {
        let sample = Sample {
            first_name: None,
            email: Some("furqonaugust".to_string()),
        };

        let err = ApiError::from(sample.validate().unwrap_err());
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors["first_name"], vec!["The first name field is required."]);
                assert_eq!(
                    errors["email"],
                    vec!["The email field must be a valid email address."]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
