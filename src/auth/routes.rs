//! Authentication routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/v1/auth/login` - Password login, issues a bearer token
pub fn auth_routes() -> Router {
    Router::new().route("/api/v1/auth/login", post(handlers::login_handler))
}
