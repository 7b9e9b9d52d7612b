/// Request extraction helpers
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules
/// before the handler sees it. Body or rule failures become [`ApiError`]s,
/// so handlers only ever receive valid input.
///
/// The deserializer helpers normalise string input the way form-oriented
/// frameworks do: a blank string is treated exactly like a missing field.

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use validator::Validate;

use crate::error::ApiError;

/// JSON body extractor that also runs validation
///
/// # Example
///
/// ```no_run
/// use contacts_api::{error::ApiResult, extract::ValidatedJson};
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Payload {
///     #[validate(length(max = 10))]
///     name: String,
/// }
///
/// async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> ApiResult<String> {
///     Ok(payload.name)
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Deserializes an optional string, trimming it and mapping blank to `None`
///
/// Use with `#[serde(default, deserialize_with = "trimmed_string")]`.
pub fn trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Deserializes an optional string, mapping `""` to `None` and keeping any
/// other value verbatim
///
/// Used for passwords, where surrounding whitespace is significant.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Unwraps a field that validation has already marked as required
///
/// # Errors
///
/// Returns the standard "required" field error if the value is absent
pub fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| {
        ApiError::field(
            field,
            format!("The {} field is required.", field.replace('_', " ")),
        )
    })
}
