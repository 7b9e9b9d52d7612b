/// Middleware modules for the API server
///
/// - `security`: Security response headers
///
/// Token authentication is wired per route group in `app.rs`.

pub mod security;
