/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use contacts_api::{app::{build_router, AppState}, config::Config};
/// use contacts_shared::store::memory::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = AppState::new(Arc::new(MemoryStore::new()), Config::in_memory());
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use contacts_shared::{auth::session, store::Store};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User and contact storage
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health                 # Health check (public)
/// └── /api/
///     ├── POST   /users              # Register (public)
///     ├── POST   /users/login        # Login (public)
///     ├── GET    /users/current      # Current user (token)
///     ├── PATCH  /users/current      # Update current user (token)
///     ├── DELETE /users/logout       # Logout (token)
///     ├── POST   /contact            # Create contact (token)
///     ├── GET    /contacts           # Search contacts (token)
///     ├── POST   /contacts           # Create contact (token)
///     ├── GET    /contacts/:id       # Get contact (token)
///     ├── PUT    /contacts/:id       # Update contact (token)
///     └── DELETE /contacts/:id       # Delete contact (token)
/// ```
///
/// Unknown paths answer 404 and known paths with the wrong method answer
/// 405, both with the JSON error body. The 405 fallback runs ahead of token
/// authentication.
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then token
/// authentication on the protected group only.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/users", post(routes::users::register))
        .route("/api/users/login", post(routes::users::login));

    let protected_routes = Router::new()
        .route(
            "/api/users/current",
            get(routes::users::current).patch(routes::users::update_current),
        )
        .route("/api/users/logout", delete(routes::users::logout))
        .route("/api/contact", post(routes::contacts::create_contact))
        .route(
            "/api/contacts",
            get(routes::contacts::search_contacts).post(routes::contacts::create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(routes::contacts::get_contact)
                .put(routes::contacts::update_contact)
                .delete(routes::contacts::delete_contact),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            token_auth_layer,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Token authentication middleware layer
///
/// Resolves the `Authorization` header to a user and injects the
/// resulting `AuthContext` into request extensions.
async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = session::authenticate(state.store.as_ref(), req.headers())
        .await
        .map_err(|err| {
            tracing::debug!(error = %err, "rejected request credentials");
            ApiError::from(err)
        })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
