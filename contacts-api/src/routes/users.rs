/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Register a new user
/// - `POST /api/users/login` - Login and receive a session token
/// - `GET /api/users/current` - Current user's profile
/// - `PATCH /api/users/current` - Update name and/or password
/// - `DELETE /api/users/logout` - Clear the session token
///
/// Passwords and tokens never appear in logs.

use axum::{extract::State, http::StatusCode, Extension, Json};
use contacts_shared::{
    auth::{password, session::AuthContext, token},
    models::user::{CreateUser, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, LOGIN_FAILED},
    extract::{non_empty_string, required, trimmed_string, ValidatedJson},
    routes::Data,
};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "The username field is required."),
        length(max = 100, message = "The username field must not be greater than 100 characters.")
    )]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "non_empty_string")]
    #[validate(
        required(message = "The password field is required."),
        length(max = 100, message = "The password field must not be greater than 100 characters.")
    )]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "The name field is required."),
        length(max = 100, message = "The name field must not be greater than 100 characters.")
    )]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "The username field is required."),
        length(max = 100, message = "The username field must not be greater than 100 characters.")
    )]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "non_empty_string")]
    #[validate(
        required(message = "The password field is required."),
        length(max = 100, message = "The password field must not be greater than 100 characters.")
    )]
    pub password: Option<String>,
}

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCurrentRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(
        max = 100,
        message = "The name field must not be greater than 100 characters."
    ))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "non_empty_string")]
    #[validate(length(
        max = 100,
        message = "The password field must not be greater than 100 characters."
    ))]
    pub password: Option<String>,
}

/// Public projection of a user
///
/// `token` is only present in the login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResource {
    pub username: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            token: None,
        }
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "username": "khannedy", "password": "rahasia", "name": "Eko Khannedy" }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "data": { "username": "...", "name": "..." } }`
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or username already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Data<UserResource>>)> {
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;
    let name = required(req.name, "name")?;

    if state.store.find_user_by_username(&username).await?.is_some() {
        tracing::info!(%username, "registration rejected: username taken");
        return Err(ApiError::field("username", "username already registered"));
    }

    let password_hash = hash_off_runtime(password).await?;

    // A concurrent registration can still win the race; the store maps the
    // unique violation to the same field error.
    let user = state
        .store
        .create_user(CreateUser {
            username,
            password_hash,
            name,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(Data::new(UserResource::from(&user)))))
}

/// Login and issue a new session token
///
/// # Endpoint
///
/// ```text
/// POST /api/users/login
/// Content-Type: application/json
///
/// { "username": "khannedy", "password": "rahasia" }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "data": { "username": "...", "name": "...", "token": "..." } }`
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown username or wrong password (same message)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<Data<UserResource>>> {
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;

    let login_failed = || ApiError::Unauthorized(LOGIN_FAILED.to_string());

    // Unknown usernames still run a full verification so both failures take
    // the same time.
    let user = state.store.find_user_by_username(&username).await?;
    let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
    let verified = verify_off_runtime(password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            tracing::info!(user_id = user.id, "login failed: wrong password");
            return Err(login_failed());
        }
        None => {
            tracing::info!(%username, "login failed: unknown username");
            return Err(login_failed());
        }
    };

    let session_token = token::generate_token();
    if !state.store.set_user_token(user.id, Some(&session_token)).await? {
        return Err(login_failed());
    }

    tracing::info!(user_id = user.id, "user logged in");

    let mut resource = UserResource::from(&user);
    resource.token = Some(session_token);

    Ok(Json(Data::new(resource)))
}

/// Current user's profile
///
/// `GET /api/users/current`
pub async fn current(Extension(auth): Extension<AuthContext>) -> Json<Data<UserResource>> {
    Json(Data::new(UserResource::from(&auth.user)))
}

/// Update the current user's name and/or password
///
/// # Endpoint
///
/// ```text
/// PATCH /api/users/current
/// Authorization: <token>
///
/// { "name": "New Name", "password": "new secret" }
/// ```
///
/// With neither field present nothing is written and the unchanged profile
/// is returned.
pub async fn update_current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<UpdateCurrentRequest>,
) -> ApiResult<Json<Data<UserResource>>> {
    let password_hash = match req.password {
        Some(password) => Some(hash_off_runtime(password).await?),
        None => None,
    };

    let changes = UpdateUser {
        name: req.name,
        password_hash,
    };

    if changes.is_empty() {
        return Ok(Json(Data::new(UserResource::from(&auth.user))));
    }

    let user = state
        .store
        .update_user(auth.user_id(), changes)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    tracing::info!(user_id = user.id, "user profile updated");

    Ok(Json(Data::new(UserResource::from(&user))))
}

/// Clear the current session token
///
/// `DELETE /api/users/logout` returns `{ "data": true }`.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Data<bool>>> {
    if !state.store.set_user_token(auth.user_id(), None).await? {
        return Err(ApiError::unauthorized());
    }

    tracing::info!(user_id = auth.user_id(), "user logged out");

    Ok(Json(Data::new(true)))
}

/// Argon2 is CPU-bound for tens of milliseconds, so it runs on the blocking
/// pool instead of an async worker
async fn hash_off_runtime(password: String) -> ApiResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|err| ApiError::InternalError(format!("password hashing task failed: {}", err)))??;
    Ok(hash)
}

/// `None` verifies against a stand-in hash and yields `false`
async fn verify_off_runtime(password: String, hash: Option<String>) -> ApiResult<bool> {
    let verified = tokio::task::spawn_blocking(move || {
        password::verify_password_or_dummy(&password, hash.as_deref())
    })
    .await
    .map_err(|err| ApiError::InternalError(format!("password verify task failed: {}", err)))??;
    Ok(verified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_without_account_runs_and_fails() {
        assert!(!verify_off_runtime("test".to_string(), None).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_and_verify_off_runtime() {
        let hash = hash_off_runtime("rahasia".to_string()).await.unwrap();

        assert!(verify_off_runtime("rahasia".to_string(), Some(hash.clone()))
            .await
            .unwrap());
        assert!(!verify_off_runtime("salah".to_string(), Some(hash))
            .await
            .unwrap());
    }

    #[test]
    fn test_register_request_reports_every_missing_field() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username":"","password":"","name":""}"#).unwrap();

        let err = ApiError::from(req.validate().unwrap_err());
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors["username"], vec!["The username field is required."]);
                assert_eq!(errors["password"], vec!["The password field is required."]);
                assert_eq!(errors["name"], vec!["The name field is required."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_update_request_name_too_long() {
        let body = serde_json::json!({ "name": "a".repeat(101) });
        let req: UpdateCurrentRequest = serde_json::from_value(body).unwrap();

        let err = ApiError::from(req.validate().unwrap_err());
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(
                    errors["name"],
                    vec!["The name field must not be greater than 100 characters."]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_resource_hides_missing_token() {
        let resource = UserResource {
            username: "test".to_string(),
            name: "test".to_string(),
            token: None,
        };

        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            serde_json::json!({ "username": "test", "name": "test" })
        );
    }
}
