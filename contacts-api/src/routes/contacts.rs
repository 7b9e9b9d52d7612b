/// Contact endpoints
///
/// Every handler runs behind token authentication and only touches the
/// authenticated user's contacts. Another user's contact answers 404, exactly
/// like a missing one.
///
/// # Endpoints
///
/// - `POST /api/contact` and `POST /api/contacts` - Create a contact
/// - `GET /api/contacts` - Search contacts with paging
/// - `GET /api/contacts/:id` - Get a contact
/// - `PUT /api/contacts/:id` - Replace a contact's fields
/// - `DELETE /api/contacts/:id` - Delete a contact

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use contacts_shared::{
    auth::session::AuthContext,
    models::contact::{Contact, ContactFilter, CreateContact, UpdateContact, DEFAULT_PAGE_SIZE},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{required, trimmed_string, ValidatedJson},
    routes::Data,
};

/// Create and update request body
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        required(message = "The first name field is required."),
        length(max = 100, message = "The first name field must not be greater than 100 characters.")
    )]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(
        max = 100,
        message = "The last name field must not be greater than 100 characters."
    ))]
    pub last_name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(
        length(max = 200, message = "The email field must not be greater than 200 characters."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    #[validate(length(
        max = 20,
        message = "The phone field must not be greater than 20 characters."
    ))]
    pub phone: Option<String>,
}

/// Search query string
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "trimmed_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "trimmed_string")]
    pub phone: Option<String>,

    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl From<SearchQuery> for ContactFilter {
    fn from(query: SearchQuery) -> Self {
        ContactFilter {
            name: query.name,
            email: query.email,
            phone: query.phone,
            page: query.page.unwrap_or(1),
            size: query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
        .normalized()
    }
}

/// Public projection of a contact
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResource {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<Contact> for ContactResource {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

/// Paging metadata for search results
#[derive(Debug, Serialize, Deserialize)]
pub struct Paging {
    pub page: u32,
    pub size: u32,
    pub total_page: u32,
}

impl Paging {
    fn new(filter: &ContactFilter, total: i64) -> Self {
        let size = i64::from(filter.size.max(1));
        let total_page = (total.max(0) + size - 1) / size;

        Self {
            page: filter.page,
            size: filter.size,
            total_page: u32::try_from(total_page).unwrap_or(u32::MAX),
        }
    }
}

/// Search response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactPage {
    pub data: Vec<ContactResource>,
    pub paging: Paging,
}

/// Non-numeric IDs can never name a contact
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| ApiError::not_found())
}

/// Create a contact
///
/// # Endpoint
///
/// ```text
/// POST /api/contacts
/// Authorization: <token>
///
/// { "first_name": "Eko", "last_name": "Khannedy", "email": "eko@pzn.com", "phone": "0899" }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "data": { "id": 1, "first_name": "Eko", ... } }`
///
/// # Errors
///
/// - `400 Bad Request`: All field violations at once
/// - `401 Unauthorized`: Missing or unknown token
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> ApiResult<(StatusCode, Json<Data<ContactResource>>)> {
    let first_name = required(req.first_name, "first_name")?;

    let contact = state
        .store
        .create_contact(CreateContact {
            user_id: auth.user_id(),
            first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
        })
        .await?;

    tracing::info!(user_id = auth.user_id(), contact_id = contact.id, "contact created");

    Ok((StatusCode::CREATED, Json(Data::new(contact.into()))))
}

/// Get one of the current user's contacts
///
/// `GET /api/contacts/:id`
///
/// # Errors
///
/// - `404 Not Found`: No such contact for this user
pub async fn get_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<ContactResource>>> {
    let id = parse_id(&id)?;

    let contact = state
        .store
        .find_contact(auth.user_id(), id)
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok(Json(Data::new(contact.into())))
}

/// Replace one of the current user's contacts
///
/// Takes the same body and rules as create. Optional fields left out are
/// cleared.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No such contact for this user
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> ApiResult<Json<Data<ContactResource>>> {
    let id = parse_id(&id)?;
    let first_name = required(req.first_name, "first_name")?;

    let contact = state
        .store
        .update_contact(
            auth.user_id(),
            id,
            UpdateContact {
                first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
            },
        )
        .await?
        .ok_or_else(ApiError::not_found)?;

    tracing::info!(user_id = auth.user_id(), contact_id = contact.id, "contact updated");

    Ok(Json(Data::new(contact.into())))
}

/// Delete one of the current user's contacts
///
/// `DELETE /api/contacts/:id` returns `{ "data": true }`.
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<bool>>> {
    let id = parse_id(&id)?;

    if !state.store.delete_contact(auth.user_id(), id).await? {
        return Err(ApiError::not_found());
    }

    tracing::info!(user_id = auth.user_id(), contact_id = id, "contact deleted");

    Ok(Json(Data::new(true)))
}

/// Search the current user's contacts
///
/// # Endpoint
///
/// ```text
/// GET /api/contacts?name=eko&email=pzn&phone=0899&page=1&size=10
/// Authorization: <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "data": [{ "id": 1, "first_name": "Eko", ... }],
///   "paging": { "page": 1, "size": 10, "total_page": 1 }
/// }
/// ```
pub async fn search_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<ContactPage>> {
    let Query(query) = query?;
    let filter = ContactFilter::from(query);

    let (contacts, total) = state
        .store
        .search_contacts(auth.user_id(), &filter)
        .await?;

    tracing::debug!(
        user_id = auth.user_id(),
        page = filter.page,
        size = filter.size,
        total,
        "contact search"
    );

    Ok(Json(ContactPage {
        data: contacts.into_iter().map(ContactResource::from).collect(),
        paging: Paging::new(&filter, total),
    }))
}
